//! Compatibility assessment
//!
//! Scores how well a template fits the project's technical constraints and
//! the categories it already uses. A `Poor` band removes the template from
//! recommendations entirely.

use crate::types::{IntelligentTemplate, RecommendationContext};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const CATEGORY_CONFLICT_PENALTY: i32 = 50;
const DATABASE_PENALTY: i32 = 30;
const FRAMEWORK_PENALTY: i32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityBand {
    Poor,
    Partial,
    Good,
    Perfect,
}

impl CompatibilityBand {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => CompatibilityBand::Perfect,
            s if s >= 70 => CompatibilityBand::Good,
            s if s >= 50 => CompatibilityBand::Partial,
            _ => CompatibilityBand::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityBand::Perfect => "perfect",
            CompatibilityBand::Good => "good",
            CompatibilityBand::Partial => "partial",
            CompatibilityBand::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityAssessment {
    pub score: i32,
    pub band: CompatibilityBand,
    /// Human-readable reason for every deduction
    pub issues: Vec<String>,
}

/// Score a template against the context, starting from 100
///
/// The spec version only feeds the content-based technical fit, it costs no
/// compatibility points.
pub fn assess(template: &IntelligentTemplate, context: &RecommendationContext) -> CompatibilityAssessment {
    let mut score = 100;
    let mut issues = Vec::new();
    let compat = &template.compatibility;

    if let Some(category) = context
        .existing_categories
        .iter()
        .find(|&cat| compat.conflicts.contains(cat))
    {
        score -= CATEGORY_CONFLICT_PENALTY;
        issues.push(format!("Declares a conflict with existing category {}", category));
    }

    if let Some(constraints) = &context.technical_constraints {
        if let Some(db) = &constraints.database {
            if !supports(&compat.supported_databases, db) {
                score -= DATABASE_PENALTY;
                issues.push(format!("Database {} is not supported", db));
            }
        }

        if let Some(framework) = &constraints.framework {
            if !supports(&compat.supported_frameworks, framework) {
                score -= FRAMEWORK_PENALTY;
                issues.push(format!("Framework {} is not supported", framework));
            }
        }
    }

    CompatibilityAssessment {
        score,
        band: CompatibilityBand::from_score(score),
        issues,
    }
}

/// Case-insensitive membership; an empty list supports nothing
pub fn supports(supported: &[String], wanted: &str) -> bool {
    supported.iter().any(|s| s.eq_ignore_ascii_case(wanted))
}

/// Dotted numeric comparison, missing or non-numeric components count as 0
pub fn is_version_compatible(required: &str, minimum: &str) -> bool {
    compare_versions(required, minimum) != Ordering::Less
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.trim()
            .split('.')
            .map(|part| part.trim().parse().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));

    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
