//! Template application and preview
//!
//! Folds a template's elements into an existing element set:
//! 1. Select template elements through the include/exclude filters
//! 2. Snapshot the existing set when a backup is requested
//! 3. Detect and resolve conflicts, MERGE unless configured otherwise
//! 4. Compose the applied set according to the merge strategy
//! 5. Estimate performance impact and run structural validation
//!
//! The caller's slice is only ever borrowed. Preview runs the same pipeline
//! without backup or validation.

use crate::backup::{self, ElementBackup};
use crate::conflict::{detect_conflicts, Conflict, ResolutionStrategy};
use crate::error::Result;
use crate::report;
use crate::resolve::resolve_conflict;
use crate::types::{ElementProperties, ElementType, IntelligentTemplate, MetaContractElement, TemplateRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Existing elements stay, template elements are added
    #[default]
    Additive,
    /// Only template elements remain, unless `preserve_existing` is set
    Replace,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApplicationConfig {
    pub generate_backup: bool,
    pub validate_after_apply: bool,
    /// With `MergeStrategy::Replace`, keep existing elements no template element collides with
    pub preserve_existing: bool,
    pub merge_strategy: MergeStrategy,
    /// Strategy per conflict id; unlisted conflicts are merged
    pub conflict_resolution: BTreeMap<String, ResolutionStrategy>,
    /// Template element ids to apply; empty means all
    pub include_elements: Vec<String>,
    /// Template element ids never applied, even when included
    pub exclude_elements: Vec<String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            generate_backup: true,
            validate_after_apply: true,
            preserve_existing: false,
            merge_strategy: MergeStrategy::Additive,
            conflict_resolution: BTreeMap::new(),
            include_elements: Vec::new(),
            exclude_elements: Vec::new(),
        }
    }
}

impl ApplicationConfig {
    pub fn with_resolution(mut self, conflict_id: impl Into<String>, strategy: ResolutionStrategy) -> Self {
        self.conflict_resolution.insert(conflict_id.into(), strategy);
        self
    }

    fn strategy_for(&self, conflict: &Conflict) -> ResolutionStrategy {
        self.conflict_resolution.get(&conflict.id).copied().unwrap_or_default()
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    pub element_count_change: i64,
    pub field_count_change: i64,
    pub relationship_count_change: i64,
    /// Applied element count over existing element count (at least 1)
    pub complexity_increase: f64,
    /// Change in weighted element complexity
    pub structural_complexity_change: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceImpact {
    pub estimated_impact: ImpactLevel,
    pub metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// A detected conflict together with the strategy that settled it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedConflict {
    #[serde(flatten)]
    pub conflict: Conflict,
    pub resolution: ResolutionStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationResult {
    pub success: bool,
    pub template: TemplateRef,
    /// The full element set after application
    pub applied_elements: Vec<MetaContractElement>,
    pub conflicts: Vec<AppliedConflict>,
    pub warnings: Vec<String>,
    pub backup: Option<ElementBackup>,
    pub performance: Option<PerformanceImpact>,
    /// `None` when validation was not requested
    pub validation_results: Option<ValidationReport>,
    pub error: Option<String>,
}

impl ApplicationResult {
    fn failure(template: &IntelligentTemplate, error: String) -> Self {
        Self {
            success: false,
            template: TemplateRef::from(template),
            applied_elements: Vec::new(),
            conflicts: Vec::new(),
            warnings: Vec::new(),
            backup: None,
            performance: None,
            validation_results: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewImpact {
    /// Template elements that would be new to the schema
    pub added: usize,
    /// Existing elements that would be merged or replaced
    pub modified: usize,
    pub conflicts: usize,
    pub estimated_performance_impact: ImpactLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewResult {
    pub conflicts: Vec<Conflict>,
    pub preview_elements: Vec<MetaContractElement>,
    pub impact: PreviewImpact,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Stateless application engine; every call works only on its arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateApplicationEngine;

impl TemplateApplicationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_template(
        &self,
        template: &IntelligentTemplate,
        existing: &[MetaContractElement],
        config: &ApplicationConfig,
    ) -> ApplicationResult {
        let Some(template_elements) = template.elements.as_deref() else {
            let error = format!("Template '{}' has no element list", template.id);
            tracing::warn!("Application failed: {}", error);
            return ApplicationResult::failure(template, error);
        };

        let backup = config.generate_backup.then(|| ElementBackup::capture(existing));
        let composition = compose(template_elements, existing, config);

        let performance = assess_performance(existing, &composition.elements);

        let validation_results = config.validate_after_apply.then(|| {
            let report = validate_elements(&composition.elements);
            if !report.valid {
                tracing::warn!(
                    "Template {} applied with validation errors: {}",
                    template.id,
                    report.errors.join("; ")
                );
            }
            report
        });

        tracing::info!(
            "Applied template {} v{}: {} elements, {} conflicts, {} impact",
            template.id,
            template.version,
            composition.elements.len(),
            composition.conflicts.len(),
            performance.estimated_impact.as_str()
        );

        ApplicationResult {
            success: true,
            template: TemplateRef::from(template),
            applied_elements: composition.elements,
            conflicts: composition.conflicts,
            warnings: composition.warnings,
            backup,
            performance: Some(performance),
            validation_results,
            error: None,
        }
    }

    /// What `apply_template` would produce, without backup or validation
    pub fn preview_template_application(
        &self,
        template: &IntelligentTemplate,
        existing: &[MetaContractElement],
        config: Option<&ApplicationConfig>,
    ) -> PreviewResult {
        let default_config = ApplicationConfig::default();
        let config = config.unwrap_or(&default_config);
        let composition = compose(template.elements(), existing, config);

        let impact = PreviewImpact {
            added: composition.added,
            modified: composition.modified,
            conflicts: composition.conflicts.len(),
            estimated_performance_impact: estimate_impact(existing.len(), composition.elements.len()),
        };

        PreviewResult {
            conflicts: composition.conflicts.into_iter().map(|c| c.conflict).collect(),
            preview_elements: composition.elements,
            impact,
        }
    }

    pub fn rollback_template_application(
        &self,
        backup: Option<&ElementBackup>,
    ) -> Result<Vec<MetaContractElement>> {
        backup::rollback(backup)
    }

    pub fn generate_application_report(&self, result: &ApplicationResult) -> String {
        report::generate_application_report(result)
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

struct Composition {
    elements: Vec<MetaContractElement>,
    conflicts: Vec<AppliedConflict>,
    warnings: Vec<String>,
    added: usize,
    modified: usize,
}

/// A resolved template element and the existing element it takes the place of
struct Resolved {
    element: MetaContractElement,
    supersedes: Option<String>,
}

fn select_elements<'a>(
    elements: &'a [MetaContractElement],
    config: &ApplicationConfig,
) -> Vec<&'a MetaContractElement> {
    elements
        .iter()
        .filter(|e| config.include_elements.is_empty() || config.include_elements.contains(&e.id))
        .filter(|e| !config.exclude_elements.contains(&e.id))
        .collect()
}

fn compose(
    template_elements: &[MetaContractElement],
    existing: &[MetaContractElement],
    config: &ApplicationConfig,
) -> Composition {
    let selected: Vec<MetaContractElement> =
        select_elements(template_elements, config).into_iter().cloned().collect();
    let conflicts = detect_conflicts(&selected, existing);
    let by_template_id: HashMap<&str, &Conflict> =
        conflicts.iter().map(|c| (c.template.id.as_str(), c)).collect();

    let mut taken: HashSet<String> = existing.iter().chain(&selected).map(|e| e.name.clone()).collect();
    let mut resolved = Vec::with_capacity(selected.len());
    let mut applied_conflicts = Vec::with_capacity(conflicts.len());
    let mut warnings = Vec::new();
    let mut claimed: HashSet<String> = HashSet::new();

    for element in &selected {
        let Some(&conflict) = by_template_id.get(element.id.as_str()) else {
            resolved.push(Resolved { element: element.clone(), supersedes: None });
            continue;
        };

        let mut strategy = config.strategy_for(conflict);
        if !config.conflict_resolution.contains_key(&conflict.id) {
            warnings.push(format!("No resolution configured for conflict '{}', merged", conflict.id));
        }

        let mut resolution = resolve_conflict(conflict, strategy, &taken);
        // An existing element can only be taken over once; later claimants are renamed
        if resolution.supersedes_existing && claimed.contains(&conflict.existing.id) {
            strategy = ResolutionStrategy::Rename;
            resolution = resolve_conflict(conflict, strategy, &taken);
        }

        if let Some(warning) = resolution.warning {
            warnings.push(warning);
        }

        if let Some(element) = resolution.element {
            taken.insert(element.name.clone());
            let supersedes = resolution.supersedes_existing.then(|| {
                claimed.insert(conflict.existing.id.clone());
                conflict.existing.id.clone()
            });
            resolved.push(Resolved { element, supersedes });
        }

        applied_conflicts.push(AppliedConflict {
            conflict: conflict.clone(),
            resolution: strategy,
        });
    }

    let added = resolved.iter().filter(|r| r.supersedes.is_none()).count();
    let modified = resolved.len() - added;

    let elements = match config.merge_strategy {
        MergeStrategy::Additive => {
            let mut slots: HashMap<String, MetaContractElement> = HashMap::new();
            let mut appended = Vec::new();
            for r in resolved {
                match r.supersedes {
                    Some(existing_id) => {
                        slots.insert(existing_id, r.element);
                    }
                    None => appended.push(r.element),
                }
            }

            let mut out: Vec<MetaContractElement> = existing
                .iter()
                .map(|e| slots.remove(&e.id).unwrap_or_else(|| e.clone()))
                .collect();
            out.extend(appended);
            out
        }
        MergeStrategy::Replace => {
            let mut out = Vec::new();
            if config.preserve_existing {
                let template_names: HashSet<&str> = selected.iter().map(|e| e.name.as_str()).collect();
                out.extend(
                    existing
                        .iter()
                        .filter(|e| !template_names.contains(e.name.as_str()))
                        .cloned(),
                );
            }
            out.extend(resolved.into_iter().map(|r| r.element));
            out
        }
    };

    Composition {
        elements,
        conflicts: applied_conflicts,
        warnings,
        added,
        modified,
    }
}

// ============================================================================
// IMPACT
// ============================================================================

fn count_of(elements: &[MetaContractElement], kind: ElementType) -> i64 {
    elements.iter().filter(|e| e.element_type() == kind).count() as i64
}

fn weighted_complexity(elements: &[MetaContractElement]) -> f64 {
    elements
        .iter()
        .map(|e| match &e.properties {
            ElementProperties::Field(f) => {
                let mut c = 1.0;
                if !f.validation.is_empty() {
                    c += 1.0;
                }
                if f.unique {
                    c += 1.0;
                }
                if f.required {
                    c += 0.5;
                }
                c
            }
            ElementProperties::Relationship(_) => 3.0,
            _ => 1.0,
        })
        .sum()
}

/// Growth of the element set: at most 20% is low, at most 50% medium
pub fn estimate_impact(before: usize, after: usize) -> ImpactLevel {
    let growth = if before > 0 {
        (after as f64 - before as f64) / before as f64
    } else if after > 0 {
        1.0
    } else {
        0.0
    };

    if growth <= 0.2 {
        ImpactLevel::Low
    } else if growth <= 0.5 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::High
    }
}

pub fn assess_performance(before: &[MetaContractElement], after: &[MetaContractElement]) -> PerformanceImpact {
    let metrics = PerformanceMetrics {
        element_count_change: after.len() as i64 - before.len() as i64,
        field_count_change: count_of(after, ElementType::Field) - count_of(before, ElementType::Field),
        relationship_count_change: count_of(after, ElementType::Relationship)
            - count_of(before, ElementType::Relationship),
        complexity_increase: after.len() as f64 / before.len().max(1) as f64,
        structural_complexity_change: weighted_complexity(after) - weighted_complexity(before),
    };

    PerformanceImpact {
        estimated_impact: estimate_impact(before.len(), after.len()),
        metrics,
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Structural checks over an element set
///
/// Errors: empty names, duplicate ids, duplicate names. Warnings: foreign keys
/// and index columns that name no field in the set.
pub fn validate_elements(elements: &[MetaContractElement]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for element in elements {
        if element.name.trim().is_empty() {
            errors.push(format!("Element '{}' has an empty name", element.id));
        } else if !names.insert(element.name.as_str()) {
            errors.push(format!("Duplicate element name '{}'", element.name));
        }

        if !ids.insert(element.id.as_str()) {
            errors.push(format!("Duplicate element id '{}'", element.id));
        }
    }

    let fields: HashSet<&str> = elements
        .iter()
        .filter(|e| e.element_type() == ElementType::Field)
        .map(|e| e.name.as_str())
        .collect();

    for element in elements {
        match &element.properties {
            ElementProperties::Relationship(r) => {
                if let Some(fk) = &r.foreign_key {
                    if !fields.contains(fk.as_str()) {
                        warnings.push(format!(
                            "Relationship '{}' uses foreign key '{}' which is not a field",
                            element.name, fk
                        ));
                    }
                }
            }
            ElementProperties::Index(i) => {
                for column in i.columns.iter().filter(|c| !fields.contains(c.as_str())) {
                    warnings.push(format!("Index '{}' references unknown column '{}'", element.name, column));
                }
            }
            _ => {}
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::conflict::{ConflictSeverity, ConflictType};
    use crate::types::FieldProperties;

    fn template(id: &str) -> IntelligentTemplate {
        catalog::builtin_templates()
            .into_iter()
            .find(|t| t.id == id)
            .unwrap()
    }

    fn field(name: &str, data_type: &str, required: bool, unique: bool) -> MetaContractElement {
        MetaContractElement::field(
            format!("existing-{}", name),
            name,
            FieldProperties {
                data_type: data_type.to_string(),
                required,
                unique,
                ..Default::default()
            },
        )
    }

    fn existing_with_email() -> Vec<MetaContractElement> {
        vec![field("email", "email", true, false)]
    }

    fn names(elements: &[MetaContractElement]) -> Vec<&str> {
        elements.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_email_constraint_conflict_replaced() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = existing_with_email();

        let config = ApplicationConfig::default()
            .with_resolution("constraint_conflict_field-email", ResolutionStrategy::Replace);
        let result = engine.apply_template(&employee, &existing, &config);

        assert!(result.success);
        assert_eq!(result.conflicts.len(), 1);
        let applied = &result.conflicts[0];
        assert_eq!(applied.conflict.conflict_type, ConflictType::ConstraintConflict);
        assert!(applied.conflict.severity >= ConflictSeverity::Medium);
        assert_eq!(applied.resolution, ResolutionStrategy::Replace);

        let email: Vec<_> = result.applied_elements.iter().filter(|e| e.name == "email").collect();
        assert_eq!(email.len(), 1);
        assert!(email[0].is_unique());
        assert_eq!(result.applied_elements.len(), 11);
    }

    #[test]
    fn test_unconfigured_conflict_is_merged() {
        let engine = TemplateApplicationEngine::new();
        let result = engine.apply_template(
            &template("hr-employee-management"),
            &existing_with_email(),
            &ApplicationConfig::default(),
        );

        assert!(result.success);
        assert_eq!(result.conflicts[0].resolution, ResolutionStrategy::Merge);
        let email = result.applied_elements.iter().find(|e| e.name == "email").unwrap();
        assert_eq!(email.id, "existing-email");
        assert!(email.is_unique());
        assert_eq!(
            result.warnings,
            vec!["No resolution configured for conflict 'constraint_conflict_field-email', merged".to_string()]
        );
    }

    #[test]
    fn test_second_claimant_on_existing_element_is_renamed() {
        let engine = TemplateApplicationEngine::new();
        let code = |id: &str| {
            MetaContractElement::field(
                id,
                "code",
                FieldProperties {
                    data_type: "string".to_string(),
                    ..Default::default()
                },
            )
        };
        let mut twin = template("technical-soft-delete");
        twin.elements = Some(vec![code("t-a"), code("t-b")]);
        let existing = vec![field("code", "string", false, false)];

        let result = engine.apply_template(&twin, &existing, &ApplicationConfig::default());

        assert!(result.success);
        assert_eq!(names(&result.applied_elements), vec!["code", "code_2"]);
        assert_eq!(result.applied_elements[0].id, "existing-code");
        assert_eq!(result.applied_elements[1].id, "t-b_2");
        assert_eq!(result.conflicts[0].resolution, ResolutionStrategy::Merge);
        assert_eq!(result.conflicts[1].resolution, ResolutionStrategy::Rename);
        assert!(result.validation_results.as_ref().is_some_and(|v| v.valid));
        assert!(result.warnings.iter().any(|w| w == "Renamed element 'code' to 'code_2' to avoid conflict"));
    }

    #[test]
    fn test_non_conflicting_apply_adds_everything() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = vec![field("phone", "string", false, false), field("notes", "text", false, false)];

        let result = engine.apply_template(&employee, &existing, &ApplicationConfig::default());
        assert!(result.conflicts.is_empty());
        assert_eq!(result.applied_elements.len(), existing.len() + employee.elements().len());
        assert_eq!(&result.applied_elements[..2], &existing[..]);
    }

    #[test]
    fn test_missing_elements_fails_fast() {
        let engine = TemplateApplicationEngine::new();
        let mut broken = template("technical-soft-delete");
        broken.elements = None;

        let result = engine.apply_template(&broken, &existing_with_email(), &ApplicationConfig::default());
        assert!(!result.success);
        assert!(result.applied_elements.is_empty());
        assert!(result.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(result.backup.is_none());
        assert!(result.performance.is_none());
    }

    #[test]
    fn test_backup_is_independent_copy() {
        let engine = TemplateApplicationEngine::new();
        let existing = existing_with_email();
        let result = engine.apply_template(&template("hr-employee-management"), &existing, &ApplicationConfig::default());

        let backup = result.backup.as_ref().unwrap();
        assert_eq!(backup.elements, existing);
        assert!(!std::ptr::eq(backup.elements.as_ptr(), existing.as_ptr()));

        let restored = engine.rollback_template_application(Some(backup)).unwrap();
        assert_eq!(restored, existing);

        let no_backup = ApplicationConfig {
            generate_backup: false,
            ..Default::default()
        };
        let result = engine.apply_template(&template("hr-employee-management"), &existing, &no_backup);
        assert!(result.backup.is_none());
    }

    #[test]
    fn test_rename_and_skip() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = existing_with_email();

        let rename = ApplicationConfig::default()
            .with_resolution("constraint_conflict_field-email", ResolutionStrategy::Rename);
        let result = engine.apply_template(&employee, &existing, &rename);
        assert_eq!(result.applied_elements.len(), 12);
        assert!(names(&result.applied_elements).contains(&"email_2"));
        assert_eq!(result.applied_elements[0], existing[0]);
        assert_eq!(result.warnings.len(), 1);

        let skip = ApplicationConfig::default()
            .with_resolution("constraint_conflict_field-email", ResolutionStrategy::Skip);
        let result = engine.apply_template(&employee, &existing, &skip);
        assert_eq!(result.applied_elements.len(), 11);
        assert_eq!(result.applied_elements[0], existing[0]);
        assert_eq!(result.warnings, vec!["Skipped element 'email' due to conflict".to_string()]);
    }

    #[test]
    fn test_include_and_exclude_filters() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");

        let config = ApplicationConfig {
            include_elements: vec!["field-id".to_string(), "field-email".to_string()],
            exclude_elements: vec!["field-email".to_string()],
            ..Default::default()
        };
        let result = engine.apply_template(&employee, &[], &config);
        assert_eq!(names(&result.applied_elements), vec!["id"]);

        let config = ApplicationConfig {
            exclude_elements: vec!["field-salary".to_string()],
            ..Default::default()
        };
        let result = engine.apply_template(&employee, &[], &config);
        assert_eq!(result.applied_elements.len(), 10);
        assert!(!names(&result.applied_elements).contains(&"salary"));
    }

    #[test]
    fn test_replace_merge_strategy() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = vec![field("email", "email", true, false), field("legacy_code", "string", false, false)];

        let replace = ApplicationConfig {
            merge_strategy: MergeStrategy::Replace,
            ..Default::default()
        };
        let result = engine.apply_template(&employee, &existing, &replace);
        assert_eq!(result.applied_elements.len(), 11);
        assert!(!names(&result.applied_elements).contains(&"legacy_code"));

        let preserve = ApplicationConfig {
            preserve_existing: true,
            ..replace
        };
        let result = engine.apply_template(&employee, &existing, &preserve);
        assert_eq!(result.applied_elements.len(), 12);
        assert_eq!(result.applied_elements[0].name, "legacy_code");
    }

    #[test]
    fn test_validation_results() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");

        let result = engine.apply_template(&employee, &[], &ApplicationConfig::default());
        let report = result.validation_results.unwrap();
        assert!(report.valid);
        assert!(report.warnings.is_empty());

        // The relationship alone has a dangling foreign key
        let config = ApplicationConfig {
            include_elements: vec!["relationship-department".to_string()],
            ..Default::default()
        };
        let report = engine.apply_template(&employee, &[], &config).validation_results.unwrap();
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);

        let off = ApplicationConfig {
            validate_after_apply: false,
            ..Default::default()
        };
        assert!(engine.apply_template(&employee, &[], &off).validation_results.is_none());
    }

    #[test]
    fn test_validation_errors_do_not_fail_application() {
        let engine = TemplateApplicationEngine::new();
        // Same id as a template element, different name
        let existing = vec![MetaContractElement::field(
            "field-email",
            "contact",
            FieldProperties {
                data_type: "string".to_string(),
                ..Default::default()
            },
        )];
        let result = engine.apply_template(&template("hr-employee-management"), &existing, &ApplicationConfig::default());

        assert!(result.success);
        let report = result.validation_results.unwrap();
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Duplicate element id 'field-email'".to_string()]);
    }

    #[test]
    fn test_validate_elements_checks() {
        let elements = vec![
            field("a", "string", false, false),
            field("a", "string", false, false),
            MetaContractElement::field("blank", " ", FieldProperties::default()),
        ];
        let report = validate_elements(&elements);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_performance_metrics() {
        let engine = TemplateApplicationEngine::new();
        let result = engine.apply_template(&template("hr-employee-management"), &[], &ApplicationConfig::default());
        let performance = result.performance.unwrap();

        assert_eq!(performance.estimated_impact, ImpactLevel::High);
        assert_eq!(performance.metrics.element_count_change, 11);
        assert_eq!(performance.metrics.field_count_change, 10);
        assert_eq!(performance.metrics.relationship_count_change, 1);
        assert_eq!(performance.metrics.complexity_increase, 11.0);
        assert!(performance.metrics.structural_complexity_change > 11.0);
    }

    #[test]
    fn test_impact_thresholds() {
        assert_eq!(estimate_impact(0, 0), ImpactLevel::Low);
        assert_eq!(estimate_impact(0, 3), ImpactLevel::High);
        assert_eq!(estimate_impact(10, 12), ImpactLevel::Low);
        assert_eq!(estimate_impact(10, 15), ImpactLevel::Medium);
        assert_eq!(estimate_impact(10, 16), ImpactLevel::High);
        assert_eq!(estimate_impact(10, 8), ImpactLevel::Low);
    }

    #[test]
    fn test_preview_does_not_mutate_existing() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = existing_with_email();
        let snapshot = existing.clone();
        let ptr = existing.as_ptr();

        let preview = engine.preview_template_application(&employee, &existing, None);

        assert_eq!(existing, snapshot);
        assert_eq!(existing.as_ptr(), ptr);
        assert_eq!(preview.conflicts.len(), 1);
        assert_eq!(preview.impact.conflicts, 1);
        assert_eq!(preview.impact.modified, 1);
        assert_eq!(preview.impact.added, 10);
        assert_eq!(preview.preview_elements.len(), 11);
        assert_eq!(preview.impact.estimated_performance_impact, ImpactLevel::High);
    }

    #[test]
    fn test_preview_matches_apply() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = existing_with_email();
        let config = ApplicationConfig::default()
            .with_resolution("constraint_conflict_field-email", ResolutionStrategy::Rename);

        let preview = engine.preview_template_application(&employee, &existing, Some(&config));
        let applied = engine.apply_template(&employee, &existing, &config);
        assert_eq!(preview.preview_elements, applied.applied_elements);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let engine = TemplateApplicationEngine::new();
        let employee = template("hr-employee-management");
        let existing = existing_with_email();
        let config = ApplicationConfig::default();

        let first = engine.apply_template(&employee, &existing, &config);
        let second = engine.apply_template(&employee, &existing, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config: ApplicationConfig = serde_json::from_str(
            r#"{"merge_strategy": "replace", "conflict_resolution": {"name_conflict_field-id": "skip"}}"#,
        )
        .unwrap();
        assert!(config.generate_backup);
        assert!(config.validate_after_apply);
        assert_eq!(config.merge_strategy, MergeStrategy::Replace);
        assert_eq!(
            config.conflict_resolution.get("name_conflict_field-id"),
            Some(&ResolutionStrategy::Skip)
        );
    }
}
