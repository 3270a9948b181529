//! Recommendation strategies
//!
//! Three independent scorers, each returning a value in [0, 100]:
//! - Content-based: how closely the template resembles what the project has
//! - Collaborative: what the community thinks of the template
//! - Rule-based: fixed bonuses for project type, industry, team size and preferences
//!
//! The recommendation engine combines them by weighted average.

use crate::compatibility::{is_version_compatible, supports};
use crate::types::{
    ElementType, IntelligentTemplate, RecommendationContext, TemplateCategory, TemplateComplexity,
    UserPreferences,
};
use std::collections::HashSet;

/// A single scoring perspective
pub trait RecommendationStrategy {
    fn name(&self) -> &'static str;
    fn weight(&self) -> f64;
    /// Score in [0, 100]
    fn score(&self, template: &IntelligentTemplate, context: &RecommendationContext) -> f64;
}

// ============================================================================
// CONTENT-BASED
// ============================================================================

const CATEGORY_FACTOR: f64 = 30.0;
const FIELD_SIMILARITY_FACTOR: f64 = 25.0;
const COMPLEXITY_FACTOR: f64 = 20.0;
const KEYWORD_FACTOR: f64 = 15.0;
const TECHNICAL_FACTOR: f64 = 10.0;

pub struct ContentBasedStrategy {
    pub weight: f64,
}

impl RecommendationStrategy for ContentBasedStrategy {
    fn name(&self) -> &'static str {
        "content-based"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    /// Terms whose inputs are absent drop out of both sides of the ratio
    fn score(&self, template: &IntelligentTemplate, context: &RecommendationContext) -> f64 {
        let mut score = 0.0;
        let mut factors = 0.0;

        if !context.existing_categories.is_empty() {
            let category_match = context
                .existing_categories
                .iter()
                .any(|&cat| template.category.matches(cat));
            if category_match {
                score += CATEGORY_FACTOR;
            }
            factors += CATEGORY_FACTOR;
        }

        score += field_type_similarity(template, context) * FIELD_SIMILARITY_FACTOR;
        factors += FIELD_SIMILARITY_FACTOR;

        if let Some(prefs) = context.user_preferences.as_ref().filter(|p| !p.complexity.is_empty()) {
            if prefs.complexity.contains(&template.complexity) {
                score += COMPLEXITY_FACTOR;
            }
            factors += COMPLEXITY_FACTOR;
        }

        score += keyword_overlap(template, context) * KEYWORD_FACTOR;
        factors += KEYWORD_FACTOR;

        score += technical_fit(template, context) * TECHNICAL_FACTOR;
        factors += TECHNICAL_FACTOR;

        (score / factors) * 100.0
    }
}

/// Jaccard similarity of the field data-type sets
fn field_type_similarity(template: &IntelligentTemplate, context: &RecommendationContext) -> f64 {
    if context.existing_elements.is_empty() {
        return 0.0;
    }

    let existing: HashSet<&str> = context
        .existing_elements
        .iter()
        .filter_map(|e| e.as_field().map(|f| f.data_type.as_str()))
        .collect();
    let offered: HashSet<&str> = template
        .elements()
        .iter()
        .filter_map(|e| e.as_field().map(|f| f.data_type.as_str()))
        .collect();

    let union = existing.union(&offered).count();
    if union == 0 {
        return 0.0;
    }
    existing.intersection(&offered).count() as f64 / union as f64
}

/// Fraction of template keywords found in the project's element names and descriptions
fn keyword_overlap(template: &IntelligentTemplate, context: &RecommendationContext) -> f64 {
    if template.keywords.is_empty() {
        return 0.0;
    }

    let corpus = context
        .existing_elements
        .iter()
        .flat_map(|e| [Some(e.name.as_str()), e.description()])
        .flatten()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    let matches = template
        .keywords
        .iter()
        .filter(|kw| corpus.contains(&kw.to_lowercase()))
        .count();
    matches as f64 / template.keywords.len() as f64
}

/// Multiplier in (0, 1]; halves per unsupported database or framework
fn technical_fit(template: &IntelligentTemplate, context: &RecommendationContext) -> f64 {
    let mut fit = 1.0;
    let Some(constraints) = &context.technical_constraints else {
        return fit;
    };
    let compat = &template.compatibility;

    if let Some(db) = &constraints.database {
        if !supports(&compat.supported_databases, db) {
            fit *= 0.5;
        }
    }
    if let Some(framework) = &constraints.framework {
        if !supports(&compat.supported_frameworks, framework) {
            fit *= 0.5;
        }
    }
    if let Some(version) = &constraints.spec_version {
        if !is_version_compatible(version, &compat.min_spec_version) {
            fit *= 0.3;
        }
    }
    fit
}

// ============================================================================
// COLLABORATIVE
// ============================================================================

/// Usage count at which the usage term saturates
const USAGE_SATURATION: f64 = 10_000.0;

pub struct CollaborativeStrategy {
    pub weight: f64,
}

impl RecommendationStrategy for CollaborativeStrategy {
    fn name(&self) -> &'static str {
        "collaborative"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, template: &IntelligentTemplate, _context: &RecommendationContext) -> f64 {
        let q = &template.quality;
        let rating = (q.community_rating / 5.0).clamp(0.0, 1.0) * 40.0;
        let usage = (q.usage_count as f64 / USAGE_SATURATION).min(1.0) * 30.0;
        let quality = (q.average_score() / 100.0).clamp(0.0, 1.0) * 30.0;
        rating + usage + quality
    }
}

// ============================================================================
// RULE-BASED
// ============================================================================

pub struct RuleBasedStrategy {
    pub weight: f64,
}

impl RecommendationStrategy for RuleBasedStrategy {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, template: &IntelligentTemplate, context: &RecommendationContext) -> f64 {
        let mut score = 0.0;

        if let Some(project_type) = &context.project_type {
            if project_type_categories(project_type).contains(&template.category) {
                score += 30.0;
            }
        }

        if let Some(industry) = &context.industry {
            if industry_categories(industry).contains(&template.category) {
                score += 25.0;
            }
        }

        if let Some(team_size) = context.team_size {
            score += team_size_score(template.complexity, team_size);
        }

        if let Some(prefs) = &context.user_preferences {
            score += preference_score(template, prefs);
        }

        score.min(100.0)
    }
}

fn project_type_categories(project_type: &str) -> &'static [TemplateCategory] {
    use TemplateCategory::*;
    match project_type.to_lowercase().as_str() {
        "hr" => &[HrManagement, EmployeeProfile, Organization],
        "finance" => &[FinancialServices, AuditTrail],
        "ecommerce" => &[Ecommerce, ProductCatalog, OrderManagement],
        "security" => &[Rbac, DataEncryption, PiiProtection],
        _ => &[],
    }
}

fn industry_categories(industry: &str) -> &'static [TemplateCategory] {
    use TemplateCategory::*;
    match industry.to_lowercase().as_str() {
        "healthcare" => &[Healthcare, PiiProtection, AuditTrail],
        "finance" => &[FinancialServices, DataEncryption, GdprCompliance],
        "education" => &[Education, UserManagement],
        "retail" => &[Ecommerce, ProductCatalog],
        _ => &[],
    }
}

/// Small teams favor basic templates, large organizations enterprise ones
fn team_size_score(complexity: TemplateComplexity, team_size: u32) -> f64 {
    let (favored, off_band) = match team_size {
        0..=3 => (TemplateComplexity::Basic, 0.0),
        4..=10 => (TemplateComplexity::Intermediate, 10.0),
        11..=50 => (TemplateComplexity::Advanced, 15.0),
        _ => (TemplateComplexity::Enterprise, 10.0),
    };
    if complexity == favored {
        20.0
    } else {
        off_band
    }
}

fn preference_score(template: &IntelligentTemplate, prefs: &UserPreferences) -> f64 {
    let mut score = 0.0;
    if prefs.categories.contains(&template.category) {
        score += 15.0;
    }
    if prefs.complexity.contains(&template.complexity) {
        score += 15.0;
    }
    if prefs.author.as_deref() == Some(template.author.id.as_str()) {
        score += 10.0;
    }
    if let Some(min_rating) = prefs.min_rating {
        if template.quality.community_rating >= min_rating {
            score += 10.0;
        }
    }
    score
}

/// Field names a template and a project both define
pub fn overlapping_field_names(template: &IntelligentTemplate, context: &RecommendationContext) -> usize {
    let existing: HashSet<&str> = context
        .existing_elements
        .iter()
        .filter(|e| e.element_type() == ElementType::Field)
        .map(|e| e.name.as_str())
        .collect();

    template
        .elements()
        .iter()
        .filter(|e| e.element_type() == ElementType::Field)
        .map(|e| e.name.as_str())
        .collect::<HashSet<_>>()
        .intersection(&existing)
        .count()
}
