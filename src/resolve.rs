//! Conflict resolution
//!
//! Turns a detected conflict plus a strategy into the element that should be
//! applied, if any. Resolution is a pure function of its inputs, so resolving
//! the same conflict twice with the same strategy gives the same element.

use crate::conflict::{Conflict, ResolutionStrategy};
use crate::types::{
    ElementProperties, FieldProperties, IndexProperties, MetaContractElement, RelationshipProperties,
    SecurityProperties, ValidationProperties,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    pub strategy: ResolutionStrategy,
    /// Element to apply, `None` when the template element is skipped
    pub element: Option<MetaContractElement>,
    /// Whether the existing element must be dropped from the applied set
    pub supersedes_existing: bool,
    pub warning: Option<String>,
}

/// Settle one conflict
///
/// `taken` holds every name already in use; RENAME picks the first
/// `{name}_{n}` (n = 2, 3, ...) that is not in it.
pub fn resolve_conflict(
    conflict: &Conflict,
    strategy: ResolutionStrategy,
    taken: &HashSet<String>,
) -> Resolution {
    let existing = &conflict.existing;
    let template = &conflict.template;

    let resolution = match strategy {
        ResolutionStrategy::Merge => {
            let (element, warning) = merge_elements(existing, template);
            Resolution {
                strategy,
                element: Some(element),
                supersedes_existing: true,
                warning,
            }
        }
        ResolutionStrategy::Replace => Resolution {
            strategy,
            element: Some(template.clone()),
            supersedes_existing: true,
            warning: None,
        },
        ResolutionStrategy::Rename => {
            let (name, suffix) = unique_name(&template.name, taken);
            let mut renamed = template.clone();
            renamed.id = format!("{}_{}", template.id, suffix);
            renamed.name = name;
            let warning = format!(
                "Renamed element '{}' to '{}' to avoid conflict",
                template.name, renamed.name
            );
            Resolution {
                strategy,
                element: Some(renamed),
                supersedes_existing: false,
                warning: Some(warning),
            }
        }
        ResolutionStrategy::Skip => Resolution {
            strategy,
            element: None,
            supersedes_existing: false,
            warning: Some(format!("Skipped element '{}' due to conflict", template.name)),
        },
    };

    tracing::debug!("Resolved {} with {}", conflict.id, strategy);
    resolution
}

fn unique_name(base: &str, taken: &HashSet<String>) -> (String, u32) {
    let mut suffix = 2;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !taken.contains(&candidate) {
            return (candidate, suffix);
        }
        suffix += 1;
    }
}

/// Template properties over existing ones, keeping the existing id and name
///
/// Scalars come from the template, optional values fall back to the existing
/// element, lists are concatenated without duplicates.
fn merge_elements(
    existing: &MetaContractElement,
    template: &MetaContractElement,
) -> (MetaContractElement, Option<String>) {
    use ElementProperties as P;

    let properties = match (&existing.properties, &template.properties) {
        (P::Field(e), P::Field(t)) => P::Field(merge_field(e, t)),
        (P::Relationship(e), P::Relationship(t)) => P::Relationship(RelationshipProperties {
            relation: t.relation.clone(),
            target: t.target.clone(),
            foreign_key: t.foreign_key.clone().or_else(|| e.foreign_key.clone()),
            cascade: t.cascade,
            description: t.description.clone().or_else(|| e.description.clone()),
        }),
        (P::Security(e), P::Security(t)) => P::Security(SecurityProperties {
            access_control: t.access_control.clone(),
            roles: union(&e.roles, &t.roles),
            encrypted_fields: union(&e.encrypted_fields, &t.encrypted_fields),
            audit: t.audit,
            description: t.description.clone().or_else(|| e.description.clone()),
        }),
        (P::Validation(e), P::Validation(t)) => P::Validation(ValidationProperties {
            rule: t.rule.clone(),
            targets: union(&e.targets, &t.targets),
            message: t.message.clone().or_else(|| e.message.clone()),
        }),
        (P::Index(e), P::Index(t)) => P::Index(IndexProperties {
            columns: union(&e.columns, &t.columns),
            unique: t.unique,
            method: t.method.clone().or_else(|| e.method.clone()),
        }),
        _ => {
            let warning = format!(
                "Cannot merge {} '{}' into {}; applied template element as is",
                template.element_type().as_str(),
                template.name,
                existing.element_type().as_str()
            );
            return (
                MetaContractElement {
                    id: existing.id.clone(),
                    name: existing.name.clone(),
                    properties: template.properties.clone(),
                },
                Some(warning),
            );
        }
    };

    (
        MetaContractElement {
            id: existing.id.clone(),
            name: existing.name.clone(),
            properties,
        },
        None,
    )
}

fn merge_field(existing: &FieldProperties, template: &FieldProperties) -> FieldProperties {
    let mut validation = existing.validation.clone();
    validation.extend(template.validation.iter().map(|(k, v)| (k.clone(), v.clone())));

    FieldProperties {
        data_type: template.data_type.clone(),
        required: template.required,
        unique: template.unique,
        nullable: template.nullable,
        sensitive: template.sensitive,
        description: template.description.clone().or_else(|| existing.description.clone()),
        default: template.default.clone().or_else(|| existing.default.clone()),
        values: union(&existing.values, &template.values),
        validation,
        precision: template.precision.or(existing.precision),
        scale: template.scale.or(existing.scale),
    }
}

/// Existing entries first, then template entries not already present
fn union(existing: &[String], template: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(existing.len() + template.len());
    for item in existing.iter().chain(template) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
