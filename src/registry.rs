//! Template registry
//!
//! One registry is built at process start and handed by reference to the
//! recommendation and application engines. `register` is the only mutator;
//! every other operation is a read.

use crate::catalog;
use crate::error::{Result, TemplateError};
use crate::types::{IntelligentTemplate, TemplateCategory, TemplateComplexity};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// In-memory catalog of templates, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<IntelligentTemplate>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// Empty registry with no built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in catalog
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.initialize();
        registry
    }

    /// Seed the built-in catalog entries
    pub fn initialize(&mut self) {
        for template in catalog::builtin_templates() {
            self.register(template);
        }
        tracing::debug!("Template registry initialized with {} templates", self.len());
    }

    /// Insert a template, replacing any existing entry with the same id in place
    pub fn register(&mut self, template: IntelligentTemplate) {
        match self.index.get(&template.id) {
            Some(&slot) => {
                tracing::debug!("Replacing template {}", template.id);
                self.templates[slot] = template;
            }
            None => {
                self.index.insert(template.id.clone(), self.templates.len());
                self.templates.push(template);
            }
        }
    }

    pub fn get_all(&self) -> &[IntelligentTemplate] {
        &self.templates
    }

    pub fn get_by_id(&self, id: &str) -> Option<&IntelligentTemplate> {
        self.index.get(id).map(|&slot| &self.templates[slot])
    }

    pub fn get_by_category(&self, category: TemplateCategory) -> Vec<&IntelligentTemplate> {
        self.templates.iter().filter(|t| t.category == category).collect()
    }

    pub fn get_by_complexity(&self, complexity: TemplateComplexity) -> Vec<&IntelligentTemplate> {
        self.templates.iter().filter(|t| t.complexity == complexity).collect()
    }

    /// Case-insensitive substring search over name, description, tags and keywords
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&IntelligentTemplate> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        self.templates
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&q)
                    || t.description.to_lowercase().contains(&q)
                    || t.tags.iter().any(|tag| tag.to_lowercase().contains(&q))
                    || t.keywords.iter().any(|kw| kw.to_lowercase().contains(&q))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Parse and register a template from JSON text
    pub fn register_json(&mut self, json: &str, origin: &Path) -> Result<String> {
        let template: IntelligentTemplate =
            serde_json::from_str(json).map_err(|source| TemplateError::Json {
                path: origin.to_path_buf(),
                source,
            })?;

        if template.id.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate {
                id: template.name,
                reason: "template id is empty".to_string(),
            });
        }

        let id = template.id.clone();
        self.register(template);
        Ok(id)
    }

    /// Register every `*.json` file under `dir`, recursively, in file-name order
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<String>> {
        let mut loaded = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                TemplateError::Io {
                    path,
                    source: e.into(),
                }
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let content = fs::read_to_string(path).map_err(|source| TemplateError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let id = self.register_json(&content, path)?;
            tracing::info!("Loaded template {} from {:?}", id, path);
            loaded.push(id);
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn ids(templates: &[&IntelligentTemplate]) -> HashSet<String> {
        templates.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_with_builtin_seeds_catalog() {
        let registry = TemplateRegistry::with_builtin();
        assert_eq!(registry.len(), catalog::builtin_templates().len());
        assert!(registry.get_by_id("hr-employee-management").is_some());
    }

    #[test]
    fn test_register_then_get_by_id() {
        let mut registry = TemplateRegistry::new();
        for template in catalog::builtin_templates() {
            let id = template.id.clone();
            registry.register(template);
            assert_eq!(registry.get_by_id(&id).map(|t| t.id.as_str()), Some(id.as_str()));
        }
    }

    #[test]
    fn test_register_overwrites_in_place() {
        let mut registry = TemplateRegistry::with_builtin();
        let before = registry.len();
        let position = registry
            .get_all()
            .iter()
            .position(|t| t.id == "technical-soft-delete")
            .unwrap();

        let mut updated = registry.get_by_id("technical-soft-delete").unwrap().clone();
        updated.name = "Soft Delete v2".to_string();
        registry.register(updated);

        assert_eq!(registry.len(), before);
        assert_eq!(registry.get_all()[position].name, "Soft Delete v2");
    }

    #[test]
    fn test_get_by_id_missing() {
        let registry = TemplateRegistry::with_builtin();
        assert!(registry.get_by_id("no-such-template").is_none());
    }

    #[test]
    fn test_filters() {
        let registry = TemplateRegistry::with_builtin();
        let hr = registry.get_by_category(TemplateCategory::HrManagement);
        assert_eq!(hr.len(), 1);
        assert_eq!(hr[0].id, "hr-employee-management");

        let basic = registry.get_by_complexity(TemplateComplexity::Basic);
        assert!(basic.iter().all(|t| t.complexity == TemplateComplexity::Basic));
        assert!(!basic.is_empty());

        assert!(registry.get_by_category(TemplateCategory::Education).is_empty());
    }

    #[test]
    fn test_search_case_insensitive() {
        let registry = TemplateRegistry::with_builtin();
        let upper = ids(&registry.search("EMPLOYEE"));
        let lower = ids(&registry.search("employee"));
        assert_eq!(upper, lower);
        assert!(upper.contains("hr-employee-management"));
    }

    #[test]
    fn test_search_blank_query_is_empty() {
        let registry = TemplateRegistry::with_builtin();
        assert!(registry.search("").is_empty());
        assert!(registry.search("   ").is_empty());
    }

    #[test]
    fn test_search_matches_tags_and_keywords() {
        let registry = TemplateRegistry::with_builtin();
        // "sku" is only a keyword
        let hits = ids(&registry.search("sku"));
        assert_eq!(hits, HashSet::from(["ecommerce-product-catalog".to_string()]));
    }

    #[test]
    fn test_load_dir_registers_json_files() {
        let dir = tempdir().unwrap();
        let mut template = catalog::builtin_templates().remove(0);
        template.id = "custom-employee".to_string();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested").join("custom.json"),
            serde_json::to_string(&template).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

        let mut registry = TemplateRegistry::new();
        let loaded = registry.load_dir(dir.path()).unwrap();
        assert_eq!(loaded, vec!["custom-employee".to_string()]);
        assert!(registry.get_by_id("custom-employee").is_some());
    }

    #[test]
    fn test_load_dir_reports_malformed_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let mut registry = TemplateRegistry::new();
        let err = registry.load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::Json { .. }));
    }
}
