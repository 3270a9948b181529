//! Template recommendation engine
//!
//! Ranks every registered template against a project context:
//! 1. Drop templates whose compatibility band is poor
//! 2. Combine the strategy scores by weighted average
//! 3. Explain the score with up to three reasons
//! 4. Estimate how many field names would collide on application

use crate::compatibility::{self, CompatibilityBand};
use crate::registry::TemplateRegistry;
use crate::search::{self, TemplateSearchFilter, TemplateSearchResult};
use crate::strategies::{
    overlapping_field_names, CollaborativeStrategy, ContentBasedStrategy, RecommendationStrategy,
    RuleBasedStrategy,
};
use crate::types::{IntelligentTemplate, RecommendationContext};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
const MAX_REASONS: usize = 3;

/// How many field names a template shares with the project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ConflictRisk {
    None,
    Low,
    Medium,
    High,
}

impl ConflictRisk {
    pub fn from_overlap(count: usize) -> Self {
        match count {
            0 => ConflictRisk::None,
            1..=2 => ConflictRisk::Low,
            3..=5 => ConflictRisk::Medium,
            _ => ConflictRisk::High,
        }
    }
}

/// A ranked suggestion, borrowed from the registry it was computed against
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    pub template: &'a IntelligentTemplate,
    /// Composite score in [0, 100]
    pub score: f64,
    pub reasons: Vec<String>,
    pub compatibility: CompatibilityBand,
    pub conflict_risk: ConflictRisk,
}

/// Relative weight of each strategy in the composite score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendationWeights {
    pub content_based: f64,
    pub collaborative: f64,
    pub rule_based: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            content_based: 0.4,
            collaborative: 0.3,
            rule_based: 0.3,
        }
    }
}

/// Recommends templates from a registry it borrows for its lifetime
pub struct RecommendationEngine<'a> {
    registry: &'a TemplateRegistry,
    strategies: Vec<Box<dyn RecommendationStrategy>>,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self::with_weights(registry, RecommendationWeights::default())
    }

    pub fn with_weights(registry: &'a TemplateRegistry, weights: RecommendationWeights) -> Self {
        Self {
            registry,
            strategies: vec![
                Box::new(ContentBasedStrategy { weight: weights.content_based }),
                Box::new(CollaborativeStrategy { weight: weights.collaborative }),
                Box::new(RuleBasedStrategy { weight: weights.rule_based }),
            ],
        }
    }

    /// Rank the catalog for a context, best first, at most `limit` entries
    pub fn get_recommendations(
        &self,
        context: &RecommendationContext,
        limit: usize,
    ) -> Vec<Recommendation<'a>> {
        let mut recommendations = Vec::new();

        for template in self.registry.get_all() {
            let assessment = compatibility::assess(template, context);
            if assessment.band == CompatibilityBand::Poor {
                tracing::debug!(
                    "Skipping template {}: poor compatibility ({}; {})",
                    template.id,
                    assessment.score,
                    assessment.issues.join("; ")
                );
                continue;
            }

            let score = self.composite_score(template, context);
            recommendations.push(Recommendation {
                template,
                score,
                reasons: generate_reasons(template, context),
                compatibility: assessment.band,
                conflict_risk: ConflictRisk::from_overlap(overlapping_field_names(template, context)),
            });
        }

        // Stable sort keeps registry order among equal scores
        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        recommendations.truncate(limit);

        tracing::debug!(
            "Recommended {} templates: {}",
            recommendations.len(),
            recommendations
                .iter()
                .map(|r| format!("{}={:.1}", r.template.id, r.score))
                .collect::<Vec<_>>()
                .join(", ")
        );
        recommendations
    }

    /// Weighted average of the strategy scores
    pub fn composite_score(&self, template: &IntelligentTemplate, context: &RecommendationContext) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        for strategy in &self.strategies {
            let score = strategy.score(template, context);
            tracing::trace!("{} {}: {:.2}", template.id, strategy.name(), score);
            weighted += score * strategy.weight();
            total_weight += strategy.weight();
        }

        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }

    pub fn search_templates(&self, filter: &TemplateSearchFilter) -> TemplateSearchResult<'a> {
        search::search_templates(self.registry, filter)
    }
}

/// Threshold checks, in priority order, capped at three
fn generate_reasons(template: &IntelligentTemplate, context: &RecommendationContext) -> Vec<String> {
    let q = &template.quality;
    let mut reasons = Vec::new();

    if q.community_rating >= 4.0 {
        reasons.push(format!("High community rating ({:.1}/5.0)", q.community_rating));
    }

    if q.usage_count > 1000 {
        reasons.push(format!("Widely adopted ({} projects)", group_thousands(q.usage_count)));
    }

    if context.existing_categories.contains(&template.category) {
        reasons.push(format!("Matches your project category ({})", template.category));
    }

    let prefers_complexity = context
        .user_preferences
        .as_ref()
        .is_some_and(|p| p.complexity.contains(&template.complexity));
    if prefers_complexity {
        reasons.push(format!("Matches preferred complexity level ({})", template.complexity));
    }

    if q.security_score >= 95.0 {
        reasons.push("Excellent security practices".to_string());
    }

    if q.performance_score >= 90.0 {
        reasons.push("Optimized for performance".to_string());
    }

    if q.best_practices_score >= 90.0 {
        reasons.push("Follows industry best practices".to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
