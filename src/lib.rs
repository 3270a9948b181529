//! schema-templates - Template Recommendation & Application
//!
//! A library of reusable schema templates (bundles of field, relationship,
//! security, validation and index elements), a multi-strategy scorer that
//! ranks them against a project's schema and preferences, and a merge engine
//! that folds a chosen template into an existing element set with conflict
//! detection, preview and exact rollback.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use schema_templates::{TemplateService, RecommendationContext, ApplicationConfig};
//!
//! let service = TemplateService::init();
//!
//! // Rank templates for the project
//! let recs = service.get_recommendations(&context, 5);
//!
//! // Look before leaping
//! let preview = service.preview_template_application(recs[0].template, &elements, None);
//!
//! // Apply, keep the backup
//! let result = service.apply_template(recs[0].template, &elements, &ApplicationConfig::default());
//! let restored = service.rollback_template_application(result.backup.as_ref())?;
//! ```
//!
//! # Architecture
//!
//! ```text
//! RecommendationContext
//!        │
//!        ▼
//! ┌──────────────────────────┐   ┌──────────────────────┐
//! │ RecommendationEngine     │◄──│ TemplateRegistry     │
//! │  compatibility::assess   │   │  catalog + JSON dirs │
//! │  content / collab / rule │   └──────────────────────┘
//! └────────────┬─────────────┘
//!              │ Recommendation[]
//!              ▼
//! ┌──────────────────────────┐
//! │ TemplateApplicationEngine│
//! │  detect → resolve → merge│──► ApplicationResult ──► report / rollback
//! └──────────────────────────┘
//! ```

pub mod apply;
pub mod backup;
pub mod catalog;
pub mod compatibility;
pub mod conflict;
pub mod convenience;
pub mod error;
pub mod recommend;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod search;
pub mod strategies;
pub mod types;

// Core types
pub use error::{Result, TemplateError};
pub use registry::TemplateRegistry;
pub use types::*;

// Recommendation and search
pub use compatibility::{CompatibilityAssessment, CompatibilityBand};
pub use recommend::{ConflictRisk, Recommendation, RecommendationEngine, RecommendationWeights};
pub use search::{SearchFacets, SortField, SortOrder, TemplateSearchFilter, TemplateSearchResult};
pub use strategies::RecommendationStrategy;

// Application
pub use apply::{
    ApplicationConfig, ApplicationResult, MergeStrategy, PreviewResult, TemplateApplicationEngine,
    ValidationReport,
};
pub use backup::ElementBackup;
pub use conflict::{detect_conflicts, Conflict, ConflictSeverity, ConflictType, ResolutionStrategy};
pub use report::generate_application_report;

// Convenience API
pub use convenience::TemplateService;
