//! Conflict detection between a template's elements and an existing set
//!
//! Purely comparative: both sets are borrowed and never modified.

use crate::types::MetaContractElement;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    NameConflict,
    TypeMismatch,
    ConstraintConflict,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::NameConflict => "NAME_CONFLICT",
            ConflictType::TypeMismatch => "TYPE_MISMATCH",
            ConflictType::ConstraintConflict => "CONSTRAINT_CONFLICT",
        }
    }

    /// Prefix of the conflict id
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ConflictType::NameConflict => "name_conflict",
            ConflictType::TypeMismatch => "type_mismatch",
            ConflictType::ConstraintConflict => "constraint_conflict",
        }
    }

    pub fn suggested_resolution(&self) -> ResolutionStrategy {
        match self {
            ConflictType::NameConflict => ResolutionStrategy::Rename,
            ConflictType::TypeMismatch => ResolutionStrategy::Replace,
            ConflictType::ConstraintConflict => ResolutionStrategy::Merge,
        }
    }

    pub fn resolution_options(&self) -> Vec<ResolutionStrategy> {
        use ResolutionStrategy::*;
        match self {
            ConflictType::NameConflict => vec![Rename, Replace, Merge, Skip],
            ConflictType::TypeMismatch => vec![Replace, Rename, Skip],
            ConflictType::ConstraintConflict => vec![Merge, Replace, Skip],
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// How a single conflict is settled
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    #[default]
    Merge,
    Replace,
    Rename,
    Skip,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::Merge => "merge",
            ResolutionStrategy::Replace => "replace",
            ResolutionStrategy::Rename => "rename",
            ResolutionStrategy::Skip => "skip",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template element colliding by name with an existing element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conflict {
    /// `{type}_{template element id}`, stable across runs
    pub id: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub existing: MetaContractElement,
    pub template: MetaContractElement,
    pub severity: ConflictSeverity,
    pub description: String,
    pub suggested_resolution: ResolutionStrategy,
    pub resolution_options: Vec<ResolutionStrategy>,
}

/// Compare every named template element against the existing set
///
/// Each template element is checked against the first existing element with
/// the same name, so it yields at most one conflict.
pub fn detect_conflicts(
    template_elements: &[MetaContractElement],
    existing: &[MetaContractElement],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for candidate in template_elements {
        if candidate.name.is_empty() {
            continue;
        }

        let Some(current) = existing.iter().find(|e| e.name == candidate.name) else {
            continue;
        };

        let conflict = classify(current, candidate);
        tracing::debug!("Detected {} on '{}' ({:?})", conflict.id, candidate.name, conflict.severity);
        conflicts.push(conflict);
    }

    conflicts
}

fn classify(existing: &MetaContractElement, template: &MetaContractElement) -> Conflict {
    let (conflict_type, severity, description) = if existing.element_type() != template.element_type() {
        (
            ConflictType::TypeMismatch,
            ConflictSeverity::Critical,
            format!(
                "Element '{}' is a {} in the schema but a {} in the template",
                template.name,
                existing.element_type().as_str(),
                template.element_type().as_str()
            ),
        )
    } else if existing.declared_type() != template.declared_type() {
        (
            ConflictType::TypeMismatch,
            ConflictSeverity::Critical,
            format!(
                "Element '{}' has type '{}' but the template declares '{}'",
                template.name,
                existing.declared_type().unwrap_or_default(),
                template.declared_type().unwrap_or_default()
            ),
        )
    } else if existing.is_unique() != template.is_unique() {
        (
            ConflictType::ConstraintConflict,
            ConflictSeverity::High,
            format!(
                "Element '{}' differs in uniqueness (existing: {}, template: {})",
                template.name,
                existing.is_unique(),
                template.is_unique()
            ),
        )
    } else if existing.is_required() != template.is_required() {
        (
            ConflictType::ConstraintConflict,
            ConflictSeverity::Medium,
            format!(
                "Element '{}' differs in required flag (existing: {}, template: {})",
                template.name,
                existing.is_required(),
                template.is_required()
            ),
        )
    } else {
        (
            ConflictType::NameConflict,
            ConflictSeverity::Medium,
            format!("Element '{}' already exists", template.name),
        )
    };

    Conflict {
        id: format!("{}_{}", conflict_type.id_prefix(), template.id),
        conflict_type,
        existing: existing.clone(),
        template: template.clone(),
        severity,
        description,
        suggested_resolution: conflict_type.suggested_resolution(),
        resolution_options: conflict_type.resolution_options(),
    }
}
