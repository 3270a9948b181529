//! Built-in template catalog
//!
//! Industry templates, technical patterns and security patterns that every
//! registry starts with. Each template is an opinionated, ready-to-apply
//! element set rather than a generic skeleton.

use crate::types::*;
use chrono::{DateTime, Utc};
use serde_json::json;

/// All built-in templates, in registration order
pub fn builtin_templates() -> Vec<IntelligentTemplate> {
    vec![
        // Industry
        employee_management(),
        organization_structure(),
        financial_account(),
        ecommerce_product_catalog(),
        // Technical patterns
        audit_trail(),
        soft_delete(),
        // Security patterns
        rbac_roles(),
        pii_protection(),
    ]
}

// ============================================================================
// SHARED BUILDING BLOCKS
// ============================================================================

const CATALOG_CREATED: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z
const DAY: i64 = 86_400;

fn catalog_date(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn system_author() -> TemplateAuthor {
    TemplateAuthor {
        id: "system".to_string(),
        name: "System Templates".to_string(),
        organization: Some("Schema Templates".to_string()),
        verified: true,
    }
}

fn default_compatibility() -> TemplateCompatibility {
    TemplateCompatibility {
        min_spec_version: "1.0".to_string(),
        supported_databases: strings(&["postgresql", "mysql", "mongodb", "sqlite"]),
        supported_frameworks: strings(&["rest", "graphql", "grpc"]),
        dependencies: Vec::new(),
        conflicts: Vec::new(),
    }
}

fn quality(performance: f64, security: f64, rating: f64, usage_count: u64) -> TemplateQuality {
    TemplateQuality {
        performance_score: performance,
        security_score: security,
        maintainability_score: 88.0,
        best_practices_score: 92.0,
        community_rating: rating,
        usage_count,
        last_validated: Some(catalog_date(CATALOG_CREATED + 180 * DAY)),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn field(
    name: &str,
    data_type: &str,
    description: &str,
    configure: impl FnOnce(&mut FieldProperties),
) -> MetaContractElement {
    let mut props = FieldProperties {
        data_type: data_type.to_string(),
        description: Some(description.to_string()),
        ..Default::default()
    };
    configure(&mut props);
    MetaContractElement::field(format!("field-{}", name), name, props)
}

fn belongs_to(name: &str, target: &str, foreign_key: &str, description: &str) -> MetaContractElement {
    MetaContractElement::relationship(
        format!("relationship-{}", name),
        name,
        RelationshipProperties {
            relation: "belongs_to".to_string(),
            target: target.to_string(),
            foreign_key: Some(foreign_key.to_string()),
            cascade: false,
            description: Some(description.to_string()),
        },
    )
}

fn index(name: &str, columns: &[&str], unique: bool) -> MetaContractElement {
    MetaContractElement::new(
        format!("index-{}", name),
        name,
        ElementProperties::Index(IndexProperties {
            columns: strings(columns),
            unique,
            method: Some("btree".to_string()),
        }),
    )
}

// ============================================================================
// INDUSTRY TEMPLATES
// ============================================================================

fn employee_management() -> IntelligentTemplate {
    let elements = vec![
        field("id", "uuid", "Unique identifier for employee", |f| f.required = true),
        field("employee_id", "string", "Employee ID with format EMP123456", |f| {
            f.required = true;
            f.unique = true;
            f.validation.insert("pattern".to_string(), json!("^EMP[0-9]{6}$"));
        }),
        field("first_name", "string", "Employee first name", |f| {
            f.required = true;
            f.validation.insert("maxLength".to_string(), json!(50));
        }),
        field("last_name", "string", "Employee last name", |f| {
            f.required = true;
            f.validation.insert("maxLength".to_string(), json!(50));
        }),
        field("email", "email", "Employee email address", |f| {
            f.required = true;
            f.unique = true;
            f.validation.insert("format".to_string(), json!("email"));
        }),
        field("department_id", "uuid", "Department identifier", |f| f.required = true),
        field("position", "string", "Job position title", |f| {
            f.required = true;
            f.validation.insert("maxLength".to_string(), json!(100));
        }),
        field("hire_date", "date", "Date when employee was hired", |f| f.required = true),
        field("salary", "decimal", "Employee salary (sensitive data)", |f| {
            f.precision = Some(10);
            f.scale = Some(2);
            f.sensitive = true;
        }),
        field("status", "enum", "Employee status", |f| {
            f.values = strings(&["active", "inactive", "terminated", "on_leave"]);
            f.default = Some(json!("active"));
        }),
        belongs_to(
            "department",
            "departments",
            "department_id",
            "Employee belongs to a department",
        ),
    ];

    IntelligentTemplate {
        id: "hr-employee-management".to_string(),
        name: "Employee Management System".to_string(),
        description: "Comprehensive employee management template with HR best practices".to_string(),
        category: TemplateCategory::HrManagement,
        complexity: TemplateComplexity::Intermediate,
        version: "1.0.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 90 * DAY),
        elements: Some(elements),
        tags: strings(&["hr", "employee", "management", "personnel"]),
        keywords: strings(&["employee", "hr", "staff", "personnel", "management"]),
        compatibility: TemplateCompatibility {
            dependencies: strings(&["hr-organization-structure"]),
            ..default_compatibility()
        },
        quality: quality(88.0, 95.0, 4.6, 3_200),
        configurable: true,
        config_options: vec![
            ConfigOption {
                key: "include_salary".to_string(),
                name: "Include Salary Field".to_string(),
                description: "Whether to include salary information".to_string(),
                kind: ConfigOptionKind::Boolean,
                required: false,
                default_value: Some(json!(true)),
                options: Vec::new(),
            },
            ConfigOption {
                key: "department_structure".to_string(),
                name: "Department Structure".to_string(),
                description: "Type of department organization".to_string(),
                kind: ConfigOptionKind::Select,
                required: true,
                default_value: Some(json!("hierarchical")),
                options: vec![
                    SelectOption { label: "Flat Structure".to_string(), value: "flat".to_string() },
                    SelectOption { label: "Hierarchical".to_string(), value: "hierarchical".to_string() },
                    SelectOption { label: "Matrix".to_string(), value: "matrix".to_string() },
                ],
            },
        ],
    }
}

fn organization_structure() -> IntelligentTemplate {
    let elements = vec![
        field("unit_id", "uuid", "Organization unit identifier", |f| f.required = true),
        field("unit_name", "string", "Display name of the unit", |f| {
            f.required = true;
            f.validation.insert("maxLength".to_string(), json!(120));
        }),
        field("unit_code", "string", "Stable short code, e.g. FIN-OPS", |f| {
            f.required = true;
            f.unique = true;
            f.validation.insert("pattern".to_string(), json!("^[A-Z]{2,5}(-[A-Z]{2,5})*$"));
        }),
        field("parent_id", "uuid", "Parent unit; empty for the root", |f| f.nullable = true),
        field("manager_id", "uuid", "Employee who manages the unit", |f| f.nullable = true),
        field("level", "integer", "Depth in the hierarchy, root is 0", |f| {
            f.required = true;
            f.default = Some(json!(0));
            f.validation.insert("min".to_string(), json!(0));
        }),
        belongs_to("parent", "organization_units", "parent_id", "Unit reports into its parent"),
        index("idx_unit_code", &["unit_code"], true),
    ];

    IntelligentTemplate {
        id: "hr-organization-structure".to_string(),
        name: "Organization Structure".to_string(),
        description: "Hierarchical organization units with managers and stable codes".to_string(),
        category: TemplateCategory::Organization,
        complexity: TemplateComplexity::Intermediate,
        version: "1.1.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 120 * DAY),
        elements: Some(elements),
        tags: strings(&["hr", "organization", "hierarchy", "org-chart"]),
        keywords: strings(&["organization", "unit", "department", "hierarchy", "manager"]),
        compatibility: default_compatibility(),
        quality: quality(86.0, 90.0, 4.3, 1_850),
        configurable: false,
        config_options: Vec::new(),
    }
}

fn financial_account() -> IntelligentTemplate {
    let elements = vec![
        field("account_id", "string", "Account number with format ACC1234567890", |f| {
            f.required = true;
            f.unique = true;
            f.validation.insert("pattern".to_string(), json!("^ACC[0-9]{10}$"));
        }),
        field("account_type", "enum", "Type of financial account", |f| {
            f.required = true;
            f.values = strings(&["checking", "savings", "credit", "loan", "investment"]);
        }),
        field("balance", "decimal", "Current account balance", |f| {
            f.required = true;
            f.precision = Some(15);
            f.scale = Some(2);
            f.default = Some(json!(0.0));
            f.sensitive = true;
        }),
        field("currency", "string", "Currency code (ISO 4217)", |f| {
            f.required = true;
            f.default = Some(json!("USD"));
            f.validation.insert("pattern".to_string(), json!("^[A-Z]{3}$"));
        }),
        field("customer_id", "uuid", "Customer identifier", |f| f.required = true),
        MetaContractElement::new(
            "security-account-access",
            "account_access",
            ElementProperties::Security(SecurityProperties {
                access_control: "attribute_based".to_string(),
                roles: strings(&["account_owner", "teller", "auditor"]),
                encrypted_fields: strings(&["balance", "account_id"]),
                audit: true,
                description: Some("PCI DSS and SOX scoped access".to_string()),
            }),
        ),
    ];

    IntelligentTemplate {
        id: "finance-account-management".to_string(),
        name: "Financial Account Management".to_string(),
        description: "Secure financial account management with compliance features".to_string(),
        category: TemplateCategory::FinancialServices,
        complexity: TemplateComplexity::Advanced,
        version: "1.0.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 60 * DAY),
        elements: Some(elements),
        tags: strings(&["finance", "account", "banking", "money"]),
        keywords: strings(&["account", "balance", "finance", "banking", "money"]),
        compatibility: TemplateCompatibility {
            supported_databases: strings(&["postgresql", "mysql"]),
            dependencies: strings(&["technical-audit-trail"]),
            ..default_compatibility()
        },
        quality: quality(85.0, 98.0, 4.4, 980),
        configurable: true,
        config_options: Vec::new(),
    }
}

fn ecommerce_product_catalog() -> IntelligentTemplate {
    let elements = vec![
        field("sku", "string", "Stock Keeping Unit identifier", |f| {
            f.required = true;
            f.unique = true;
            f.validation.insert("maxLength".to_string(), json!(50));
        }),
        field("name", "string", "Product name", |f| {
            f.required = true;
            f.validation.insert("maxLength".to_string(), json!(200));
        }),
        field("description", "text", "Product description", |_| {}),
        field("price", "decimal", "Product price", |f| {
            f.required = true;
            f.precision = Some(10);
            f.scale = Some(2);
            f.validation.insert("min".to_string(), json!(0));
        }),
        field("category_id", "uuid", "Product category identifier", |f| f.required = true),
        field("inventory_count", "integer", "Available inventory count", |f| {
            f.required = true;
            f.default = Some(json!(0));
            f.validation.insert("min".to_string(), json!(0));
        }),
        index("idx_sku", &["sku"], true),
    ];

    IntelligentTemplate {
        id: "ecommerce-product-catalog".to_string(),
        name: "E-commerce Product Catalog".to_string(),
        description: "Product catalog template for e-commerce applications".to_string(),
        category: TemplateCategory::Ecommerce,
        complexity: TemplateComplexity::Basic,
        version: "1.0.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 30 * DAY),
        elements: Some(elements),
        tags: strings(&["ecommerce", "product", "catalog", "inventory"]),
        keywords: strings(&["product", "sku", "price", "inventory", "catalog"]),
        compatibility: default_compatibility(),
        quality: quality(90.0, 85.0, 4.2, 5_400),
        configurable: true,
        config_options: Vec::new(),
    }
}

// ============================================================================
// TECHNICAL PATTERNS
// ============================================================================

fn audit_trail() -> IntelligentTemplate {
    let elements = vec![
        field("audit_id", "uuid", "Unique audit log identifier", |f| f.required = true),
        field("entity_type", "string", "Type of entity being audited", |f| {
            f.required = true;
            f.validation.insert("maxLength".to_string(), json!(100));
        }),
        field("entity_id", "string", "Identifier of the audited entity", |f| f.required = true),
        field("action", "enum", "Action performed on the entity", |f| {
            f.required = true;
            f.values = strings(&["create", "read", "update", "delete", "login", "logout"]);
        }),
        field("user_id", "uuid", "User who performed the action", |f| f.required = true),
        field("timestamp", "datetime", "When the action occurred", |f| {
            f.required = true;
            f.default = Some(json!("now()"));
        }),
        field("old_values", "json", "Previous values before change", |_| {}),
        field("new_values", "json", "New values after change", |_| {}),
        index("idx_audit_entity", &["entity_type", "entity_id"], false),
    ];

    IntelligentTemplate {
        id: "technical-audit-trail".to_string(),
        name: "Audit Trail System".to_string(),
        description: "Comprehensive audit trail template for compliance and security".to_string(),
        category: TemplateCategory::AuditTrail,
        complexity: TemplateComplexity::Intermediate,
        version: "1.2.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 150 * DAY),
        elements: Some(elements),
        tags: strings(&["audit", "trail", "compliance", "security", "logging"]),
        keywords: strings(&["audit", "log", "trail", "compliance", "tracking"]),
        compatibility: default_compatibility(),
        quality: quality(92.0, 98.0, 4.7, 12_500),
        configurable: true,
        config_options: Vec::new(),
    }
}

fn soft_delete() -> IntelligentTemplate {
    let elements = vec![
        field("deleted_at", "datetime", "Timestamp when record was soft deleted", |f| {
            f.nullable = true;
        }),
        field("deleted_by", "uuid", "User who performed the soft delete", |f| {
            f.nullable = true;
        }),
        field("delete_reason", "string", "Reason for deletion", |f| {
            f.nullable = true;
            f.validation.insert("maxLength".to_string(), json!(500));
        }),
        MetaContractElement::new(
            "validation-deleted_by_required",
            "deleted_by_required",
            ElementProperties::Validation(ValidationProperties {
                rule: "deleted_at IS NULL OR deleted_by IS NOT NULL".to_string(),
                targets: strings(&["deleted_at", "deleted_by"]),
                message: Some("A soft delete must record who performed it".to_string()),
            }),
        ),
    ];

    IntelligentTemplate {
        id: "technical-soft-delete".to_string(),
        name: "Soft Delete Pattern".to_string(),
        description: "Soft delete implementation with recovery capability".to_string(),
        category: TemplateCategory::SoftDelete,
        complexity: TemplateComplexity::Basic,
        version: "1.0.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 45 * DAY),
        elements: Some(elements),
        tags: strings(&["soft-delete", "recovery", "data-protection"]),
        keywords: strings(&["delete", "soft", "recovery", "restore"]),
        // Retained rows work against right-to-erasure requirements
        compatibility: TemplateCompatibility {
            conflicts: vec![TemplateCategory::GdprCompliance],
            ..default_compatibility()
        },
        quality: quality(95.0, 90.0, 4.5, 7_800),
        configurable: true,
        config_options: Vec::new(),
    }
}

// ============================================================================
// SECURITY PATTERNS
// ============================================================================

fn rbac_roles() -> IntelligentTemplate {
    let elements = vec![
        field("role_id", "uuid", "Role identifier", |f| f.required = true),
        field("role_name", "string", "Role name", |f| {
            f.required = true;
            f.unique = true;
            f.validation.insert("maxLength".to_string(), json!(100));
        }),
        field("permissions", "json", "Array of permissions assigned to role", |f| {
            f.required = true;
        }),
        field("description", "text", "Role description", |_| {}),
        field("is_system_role", "boolean", "Whether this is a system-defined role", |f| {
            f.required = true;
            f.default = Some(json!(false));
        }),
        MetaContractElement::new(
            "security-role-admin",
            "role_admin",
            ElementProperties::Security(SecurityProperties {
                access_control: "admin_only".to_string(),
                roles: strings(&["admin"]),
                encrypted_fields: Vec::new(),
                audit: true,
                description: Some("System roles are immutable".to_string()),
            }),
        ),
    ];

    IntelligentTemplate {
        id: "security-rbac-roles".to_string(),
        name: "RBAC Role Management".to_string(),
        description: "Role-based access control template with permission management".to_string(),
        category: TemplateCategory::Rbac,
        complexity: TemplateComplexity::Intermediate,
        version: "1.0.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 75 * DAY),
        elements: Some(elements),
        tags: strings(&["rbac", "roles", "permissions", "security", "access-control"]),
        keywords: strings(&["role", "permission", "access", "control", "security"]),
        compatibility: TemplateCompatibility {
            dependencies: strings(&["user-management"]),
            ..default_compatibility()
        },
        quality: quality(88.0, 98.0, 4.8, 9_100),
        configurable: true,
        config_options: Vec::new(),
    }
}

fn pii_protection() -> IntelligentTemplate {
    let elements = vec![
        field("data_subject_id", "uuid", "Person the record describes", |f| f.required = true),
        field("consent_given", "boolean", "Whether processing consent was given", |f| {
            f.required = true;
            f.default = Some(json!(false));
        }),
        field("consent_date", "datetime", "When consent was recorded", |f| f.nullable = true),
        field("retention_until", "date", "Date after which the record must be erased", |f| {
            f.required = true;
        }),
        MetaContractElement::new(
            "security-pii-encryption",
            "pii_encryption",
            ElementProperties::Security(SecurityProperties {
                access_control: "need_to_know".to_string(),
                roles: strings(&["privacy_officer"]),
                encrypted_fields: strings(&["data_subject_id"]),
                audit: true,
                description: Some("Field-level encryption for personal data".to_string()),
            }),
        ),
        MetaContractElement::new(
            "validation-consent_date",
            "consent_date_required",
            ElementProperties::Validation(ValidationProperties {
                rule: "consent_given = false OR consent_date IS NOT NULL".to_string(),
                targets: strings(&["consent_given", "consent_date"]),
                message: Some("Consent must be dated".to_string()),
            }),
        ),
    ];

    IntelligentTemplate {
        id: "security-pii-protection".to_string(),
        name: "PII Protection".to_string(),
        description: "Consent tracking, retention limits and encryption for personal data".to_string(),
        category: TemplateCategory::PiiProtection,
        complexity: TemplateComplexity::Enterprise,
        version: "2.0.0".to_string(),
        author: system_author(),
        created_at: catalog_date(CATALOG_CREATED),
        updated_at: catalog_date(CATALOG_CREATED + 200 * DAY),
        elements: Some(elements),
        tags: strings(&["pii", "privacy", "gdpr", "security", "encryption"]),
        keywords: strings(&["consent", "privacy", "retention", "personal", "gdpr"]),
        compatibility: TemplateCompatibility {
            min_spec_version: "1.2".to_string(),
            ..default_compatibility()
        },
        quality: quality(80.0, 99.0, 4.1, 640),
        configurable: false,
        config_options: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_templates_have_unique_ids() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 8);

        let ids: HashSet<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), templates.len(), "Template IDs should be unique");
    }

    #[test]
    fn test_builtin_templates_have_required_fields() {
        for template in builtin_templates() {
            assert!(!template.id.is_empty(), "Template ID should not be empty");
            assert!(!template.name.is_empty(), "Template name should not be empty");
            assert!(!template.version.is_empty(), "Template version should not be empty");
            assert!(!template.elements().is_empty(), "{} should have elements", template.id);
            assert!(!template.keywords.is_empty(), "{} should have keywords", template.id);
            assert!(template.quality.community_rating <= 5.0);
        }
    }

    #[test]
    fn test_element_ids_unique_within_template() {
        for template in builtin_templates() {
            let ids: HashSet<_> = template.elements().iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids.len(), template.elements().len(), "duplicate ids in {}", template.id);
        }
    }

    #[test]
    fn test_employee_management_shape() {
        let template = employee_management();
        assert_eq!(template.elements().len(), 11);

        let email = template
            .elements()
            .iter()
            .find(|e| e.name == "email")
            .and_then(|e| e.as_field())
            .expect("email field");
        assert_eq!(email.data_type, "email");
        assert!(email.unique);
        assert!(email.required);
    }

    #[test]
    fn test_template_serialization() {
        let templates = builtin_templates();
        let json = serde_json::to_string(&templates).unwrap();
        let parsed: Vec<IntelligentTemplate> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, templates);
    }
}
