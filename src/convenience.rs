//! One-stop service for embedding applications
//!
//! `TemplateService` owns the registry and exposes the six engine calls
//! (recommend, search, preview, apply, rollback, report) plus id-based
//! shortcuts. Build it once at startup and share it by reference.
//!
//! ```rust,ignore
//! let mut service = TemplateService::init();
//! service.load_catalog_dir(Path::new("./templates"))?;
//!
//! let recs = service.get_recommendations(&context, 5);
//! let result = service.apply_by_id(&recs[0].template.id, &elements, &ApplicationConfig::default())?;
//! println!("{}", service.generate_application_report(&result));
//! ```

use crate::apply::{ApplicationConfig, ApplicationResult, PreviewResult, TemplateApplicationEngine};
use crate::backup::ElementBackup;
use crate::recommend::{Recommendation, RecommendationEngine, RecommendationWeights};
use crate::registry::TemplateRegistry;
use crate::search::{TemplateSearchFilter, TemplateSearchResult};
use crate::types::{IntelligentTemplate, MetaContractElement, RecommendationContext};
use anyhow::{Context, Result};
use std::path::Path;

pub struct TemplateService {
    registry: TemplateRegistry,
    weights: RecommendationWeights,
    engine: TemplateApplicationEngine,
}

impl Default for TemplateService {
    fn default() -> Self {
        Self::init()
    }
}

impl TemplateService {
    /// Service over the built-in catalog with default weights
    pub fn init() -> Self {
        Self::with_registry(TemplateRegistry::with_builtin())
    }

    pub fn with_registry(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            weights: RecommendationWeights::default(),
            engine: TemplateApplicationEngine::new(),
        }
    }

    pub fn with_weights(mut self, weights: RecommendationWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Register every JSON template under `dir`
    pub fn load_catalog_dir(&mut self, dir: &Path) -> Result<Vec<String>> {
        let loaded = self
            .registry
            .load_dir(dir)
            .with_context(|| format!("Failed to load template catalog from {:?}", dir))?;
        tracing::info!("Loaded {} templates from {:?}", loaded.len(), dir);
        Ok(loaded)
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn template(&self, id: &str) -> Result<&IntelligentTemplate> {
        self.registry
            .get_by_id(id)
            .with_context(|| format!("Template not found: {}", id))
    }

    pub fn get_recommendations(&self, context: &RecommendationContext, limit: usize) -> Vec<Recommendation<'_>> {
        RecommendationEngine::with_weights(&self.registry, self.weights).get_recommendations(context, limit)
    }

    pub fn search_templates(&self, filter: &TemplateSearchFilter) -> TemplateSearchResult<'_> {
        RecommendationEngine::with_weights(&self.registry, self.weights).search_templates(filter)
    }

    pub fn preview_template_application(
        &self,
        template: &IntelligentTemplate,
        existing: &[MetaContractElement],
        config: Option<&ApplicationConfig>,
    ) -> PreviewResult {
        self.engine.preview_template_application(template, existing, config)
    }

    pub fn apply_template(
        &self,
        template: &IntelligentTemplate,
        existing: &[MetaContractElement],
        config: &ApplicationConfig,
    ) -> ApplicationResult {
        self.engine.apply_template(template, existing, config)
    }

    pub fn preview_by_id(
        &self,
        id: &str,
        existing: &[MetaContractElement],
        config: Option<&ApplicationConfig>,
    ) -> Result<PreviewResult> {
        let template = self.template(id)?;
        Ok(self.preview_template_application(template, existing, config))
    }

    pub fn apply_by_id(
        &self,
        id: &str,
        existing: &[MetaContractElement],
        config: &ApplicationConfig,
    ) -> Result<ApplicationResult> {
        let template = self.template(id)?;
        Ok(self.apply_template(template, existing, config))
    }

    pub fn rollback_template_application(&self, backup: Option<&ElementBackup>) -> Result<Vec<MetaContractElement>> {
        Ok(self.engine.rollback_template_application(backup)?)
    }

    pub fn generate_application_report(&self, result: &ApplicationResult) -> String {
        self.engine.generate_application_report(result)
    }
}
