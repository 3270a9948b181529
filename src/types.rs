//! Core types for the schema template engine
//!
//! A schema is a flat set of [`MetaContractElement`]s. Each element owns a
//! typed property payload selected by its kind, so the conflict detector and
//! the merge engine match exhaustively instead of probing loose property bags.
//!
//! Elements are value objects: a template and a project schema never share an
//! element by reference, they each hold their own copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// ELEMENTS
// ============================================================================

/// The five kinds of schema primitive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Field,
    Relationship,
    Security,
    Validation,
    Index,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Field => "field",
            ElementType::Relationship => "relationship",
            ElementType::Security => "security",
            ElementType::Validation => "validation",
            ElementType::Index => "index",
        }
    }
}

/// A single schema primitive with a kind-specific property payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetaContractElement {
    /// Unique within the element set that owns it
    pub id: String,
    pub name: String,
    pub properties: ElementProperties,
}

/// Property payload, tagged by element kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementProperties {
    Field(FieldProperties),
    Relationship(RelationshipProperties),
    Security(SecurityProperties),
    Validation(ValidationProperties),
    Index(IndexProperties),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldProperties {
    /// Declared data type (uuid, string, email, decimal, ...)
    #[serde(rename = "type")]
    pub data_type: String,
    pub required: bool,
    pub unique: bool,
    pub nullable: bool,
    /// Marks personal or financial data that callers should encrypt or mask
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values for enum fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Named validation rules (pattern, maxLength, min, format, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub validation: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelationshipProperties {
    /// belongs_to, has_many, has_one, many_to_many
    pub relation: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    pub cascade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityProperties {
    pub access_control: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub encrypted_fields: Vec<String>,
    pub audit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationProperties {
    pub rule: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexProperties {
    pub columns: Vec<String>,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl MetaContractElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>, properties: ElementProperties) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties,
        }
    }

    pub fn field(id: impl Into<String>, name: impl Into<String>, props: FieldProperties) -> Self {
        Self::new(id, name, ElementProperties::Field(props))
    }

    pub fn relationship(
        id: impl Into<String>,
        name: impl Into<String>,
        props: RelationshipProperties,
    ) -> Self {
        Self::new(id, name, ElementProperties::Relationship(props))
    }

    pub fn element_type(&self) -> ElementType {
        match &self.properties {
            ElementProperties::Field(_) => ElementType::Field,
            ElementProperties::Relationship(_) => ElementType::Relationship,
            ElementProperties::Security(_) => ElementType::Security,
            ElementProperties::Validation(_) => ElementType::Validation,
            ElementProperties::Index(_) => ElementType::Index,
        }
    }

    /// Declared data type, for the kinds that have one
    ///
    /// Fields report their data type and relationships their relation kind.
    /// Security, validation and index elements are typed by their kind alone.
    pub fn declared_type(&self) -> Option<&str> {
        match &self.properties {
            ElementProperties::Field(f) => Some(f.data_type.as_str()),
            ElementProperties::Relationship(r) => Some(r.relation.as_str()),
            ElementProperties::Security(_)
            | ElementProperties::Validation(_)
            | ElementProperties::Index(_) => None,
        }
    }

    pub fn is_required(&self) -> bool {
        match &self.properties {
            ElementProperties::Field(f) => f.required,
            _ => false,
        }
    }

    pub fn is_unique(&self) -> bool {
        match &self.properties {
            ElementProperties::Field(f) => f.unique,
            ElementProperties::Index(i) => i.unique,
            _ => false,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.properties {
            ElementProperties::Field(f) => f.description.as_deref(),
            ElementProperties::Relationship(r) => r.description.as_deref(),
            ElementProperties::Security(s) => s.description.as_deref(),
            ElementProperties::Validation(v) => v.message.as_deref(),
            ElementProperties::Index(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldProperties> {
        match &self.properties {
            ElementProperties::Field(f) => Some(f),
            _ => None,
        }
    }
}

// ============================================================================
// TEMPLATES
// ============================================================================

/// Business or technical domain a template belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    HrManagement,
    EmployeeProfile,
    Organization,
    FinancialServices,
    Ecommerce,
    ProductCatalog,
    OrderManagement,
    Healthcare,
    Education,
    AuditTrail,
    SoftDelete,
    VersionControl,
    Rbac,
    PermissionManagement,
    UserManagement,
    DataEncryption,
    PiiProtection,
    GdprCompliance,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::HrManagement => "hr-management",
            TemplateCategory::EmployeeProfile => "employee-profile",
            TemplateCategory::Organization => "organization",
            TemplateCategory::FinancialServices => "financial-services",
            TemplateCategory::Ecommerce => "ecommerce",
            TemplateCategory::ProductCatalog => "product-catalog",
            TemplateCategory::OrderManagement => "order-management",
            TemplateCategory::Healthcare => "healthcare",
            TemplateCategory::Education => "education",
            TemplateCategory::AuditTrail => "audit-trail",
            TemplateCategory::SoftDelete => "soft-delete",
            TemplateCategory::VersionControl => "version-control",
            TemplateCategory::Rbac => "rbac",
            TemplateCategory::PermissionManagement => "permission-management",
            TemplateCategory::UserManagement => "user-management",
            TemplateCategory::DataEncryption => "data-encryption",
            TemplateCategory::PiiProtection => "pii-protection",
            TemplateCategory::GdprCompliance => "gdpr-compliance",
        }
    }

    /// Categories that commonly appear alongside this one
    fn related(&self) -> &'static [TemplateCategory] {
        use TemplateCategory::*;
        match self {
            HrManagement => &[EmployeeProfile, Organization],
            FinancialServices => &[AuditTrail, DataEncryption],
            Ecommerce => &[ProductCatalog, OrderManagement],
            Rbac => &[PermissionManagement, UserManagement],
            AuditTrail => &[VersionControl, SoftDelete],
            DataEncryption => &[PiiProtection, GdprCompliance],
            _ => &[],
        }
    }

    /// Equal or related in either direction
    pub fn matches(&self, other: TemplateCategory) -> bool {
        *self == other || self.related().contains(&other) || other.related().contains(self)
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TemplateComplexity {
    Basic,
    Intermediate,
    Advanced,
    Enterprise,
}

impl TemplateComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateComplexity::Basic => "basic",
            TemplateComplexity::Intermediate => "intermediate",
            TemplateComplexity::Advanced => "advanced",
            TemplateComplexity::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for TemplateComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateAuthor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// Technical envelope a template is known to work in
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateCompatibility {
    pub min_spec_version: String,
    /// An empty list supports no requested database
    pub supported_databases: Vec<String>,
    pub supported_frameworks: Vec<String>,
    /// Ids of templates this one builds on
    pub dependencies: Vec<String>,
    /// Categories this template should not be combined with
    pub conflicts: Vec<TemplateCategory>,
}

/// Quality signals: scores in [0, 100], rating in [0, 5]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateQuality {
    pub performance_score: f64,
    pub security_score: f64,
    pub maintainability_score: f64,
    pub best_practices_score: f64,
    pub community_rating: f64,
    pub usage_count: u64,
    #[serde(default)]
    pub last_validated: Option<DateTime<Utc>>,
}

impl TemplateQuality {
    /// Mean of the four quality scores
    pub fn average_score(&self) -> f64 {
        (self.performance_score
            + self.security_score
            + self.maintainability_score
            + self.best_practices_score)
            / 4.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOptionKind {
    Boolean,
    String,
    Number,
    Select,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// A knob the template exposes to whoever applies it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigOption {
    pub key: String,
    pub name: String,
    pub description: String,
    pub kind: ConfigOptionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

/// A named, versioned, quality-scored bundle of schema elements
///
/// Immutable once registered. `elements` is optional only so that malformed
/// input can be represented and rejected at application time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntelligentTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: TemplateCategory,
    pub complexity: TemplateComplexity,
    pub version: String,
    pub author: TemplateAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub elements: Option<Vec<MetaContractElement>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub compatibility: TemplateCompatibility,
    pub quality: TemplateQuality,
    #[serde(default)]
    pub configurable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_options: Vec<ConfigOption>,
}

impl IntelligentTemplate {
    /// Template elements, empty when the element list is missing
    pub fn elements(&self) -> &[MetaContractElement] {
        self.elements.as_deref().unwrap_or(&[])
    }
}

/// Lightweight handle to a template, carried by results that outlive a borrow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateRef {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl From<&IntelligentTemplate> for TemplateRef {
    fn from(template: &IntelligentTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            version: template.version.clone(),
        }
    }
}

// ============================================================================
// RECOMMENDATION CONTEXT
// ============================================================================

/// Everything the recommender knows about the project asking for templates
///
/// Absent fields mean "no preference": the matching scoring term is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationContext {
    pub existing_elements: Vec<MetaContractElement>,
    pub existing_categories: Vec<TemplateCategory>,
    pub user_preferences: Option<UserPreferences>,
    /// hr, finance, ecommerce, security
    pub project_type: Option<String>,
    /// healthcare, finance, education, retail
    pub industry: Option<String>,
    pub team_size: Option<u32>,
    pub technical_constraints: Option<TechnicalConstraints>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub categories: Vec<TemplateCategory>,
    pub complexity: Vec<TemplateComplexity>,
    /// Author id
    pub author: Option<String>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalConstraints {
    pub database: Option<String>,
    pub framework: Option<String>,
    pub spec_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_field() -> MetaContractElement {
        MetaContractElement::field(
            "field-email",
            "email",
            FieldProperties {
                data_type: "email".to_string(),
                required: true,
                unique: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_element_kind_accessors() {
        let email = email_field();
        assert_eq!(email.element_type(), ElementType::Field);
        assert_eq!(email.declared_type(), Some("email"));
        assert!(email.is_required());
        assert!(email.is_unique());

        let index = MetaContractElement::new(
            "idx-email",
            "idx_email",
            ElementProperties::Index(IndexProperties {
                columns: vec!["email".to_string()],
                unique: true,
                method: None,
            }),
        );
        assert_eq!(index.declared_type(), None);
        assert!(!index.is_required());
        assert!(index.is_unique());
    }

    #[test]
    fn test_element_wire_format() {
        let json = serde_json::to_value(email_field()).unwrap();
        assert_eq!(json["properties"]["kind"], "field");
        assert_eq!(json["properties"]["type"], "email");
        assert_eq!(json["properties"]["unique"], true);
        // Empty collections stay off the wire
        assert!(json["properties"].get("values").is_none());
    }

    #[test]
    fn test_element_deserializes_with_defaults() {
        let element: MetaContractElement = serde_json::from_value(serde_json::json!({
            "id": "rel-dept",
            "name": "department",
            "properties": { "kind": "relationship", "relation": "belongs_to", "target": "departments" }
        }))
        .unwrap();
        assert_eq!(element.element_type(), ElementType::Relationship);
        assert_eq!(element.declared_type(), Some("belongs_to"));
        match element.properties {
            ElementProperties::Relationship(r) => {
                assert_eq!(r.foreign_key, None);
                assert!(!r.cascade);
            }
            other => panic!("expected relationship, got {:?}", other),
        }
    }

    #[test]
    fn test_category_matching_is_symmetric() {
        assert!(TemplateCategory::HrManagement.matches(TemplateCategory::HrManagement));
        assert!(TemplateCategory::HrManagement.matches(TemplateCategory::Organization));
        assert!(TemplateCategory::Organization.matches(TemplateCategory::HrManagement));
        assert!(!TemplateCategory::Ecommerce.matches(TemplateCategory::Healthcare));
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&TemplateCategory::HrManagement).unwrap(),
            "\"hr-management\""
        );
        assert_eq!(
            serde_json::to_string(&TemplateComplexity::Enterprise).unwrap(),
            "\"enterprise\""
        );
        for category in [TemplateCategory::PiiProtection, TemplateCategory::Rbac] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_quality_average() {
        let quality = TemplateQuality {
            performance_score: 80.0,
            security_score: 90.0,
            maintainability_score: 70.0,
            best_practices_score: 100.0,
            community_rating: 4.0,
            usage_count: 10,
            last_validated: None,
        };
        assert!((quality.average_score() - 85.0).abs() < f64::EPSILON);
    }
}
