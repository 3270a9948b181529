//! Template search with filtering, sorting, pagination and facets
//!
//! Filters apply in a fixed order: free text, categories, complexity, tags,
//! author, rating range. Facets describe the whole filtered set, not just the
//! returned page.

use crate::registry::TemplateRegistry;
use crate::types::{IntelligentTemplate, TemplateCategory, TemplateComplexity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: usize = 20;
const TOP_TAGS: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Rating,
    Usage,
    #[serde(alias = "recency")]
    Recent,
    Name,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSearchFilter {
    /// Free text; a blank query places no constraint
    pub query: Option<String>,
    pub categories: Vec<TemplateCategory>,
    pub complexity: Vec<TemplateComplexity>,
    /// Matches templates carrying at least one of these tags
    pub tags: Vec<String>,
    /// Author id
    pub author: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub sort_by: Option<SortField>,
    pub sort_order: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSearchResult<'a> {
    /// The requested page
    pub templates: Vec<&'a IntelligentTemplate>,
    /// Size of the filtered set before pagination
    pub total: usize,
    pub facets: SearchFacets,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetCount<T> {
    pub value: T,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchFacets {
    pub categories: Vec<FacetCount<TemplateCategory>>,
    pub complexity: Vec<FacetCount<TemplateComplexity>>,
    /// Most frequent first, at most 20
    pub tags: Vec<FacetCount<String>>,
    /// Keyed by author display name
    pub authors: Vec<FacetCount<String>>,
}

pub fn search_templates<'a>(
    registry: &'a TemplateRegistry,
    filter: &TemplateSearchFilter,
) -> TemplateSearchResult<'a> {
    let mut templates: Vec<&IntelligentTemplate> = match filter.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => registry.search(q),
        _ => registry.get_all().iter().collect(),
    };

    if !filter.categories.is_empty() {
        templates.retain(|t| filter.categories.contains(&t.category));
    }

    if !filter.complexity.is_empty() {
        templates.retain(|t| filter.complexity.contains(&t.complexity));
    }

    if !filter.tags.is_empty() {
        templates.retain(|t| filter.tags.iter().any(|tag| t.tags.contains(tag)));
    }

    if let Some(author) = &filter.author {
        templates.retain(|t| &t.author.id == author);
    }

    if let Some(min) = filter.min_rating {
        templates.retain(|t| t.quality.community_rating >= min);
    }

    if let Some(max) = filter.max_rating {
        templates.retain(|t| t.quality.community_rating <= max);
    }

    if let Some(field) = filter.sort_by {
        sort_templates(&mut templates, field, filter.sort_order);
    }

    let total = templates.len();
    let facets = generate_facets(&templates);
    let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let page = templates.into_iter().skip(filter.offset).take(limit).collect();

    TemplateSearchResult {
        templates: page,
        total,
        facets,
    }
}

fn sort_templates(templates: &mut [&IntelligentTemplate], field: SortField, order: SortOrder) {
    templates.sort_by(|a, b| {
        let ordering = match field {
            SortField::Rating => a.quality.community_rating.total_cmp(&b.quality.community_rating),
            SortField::Usage => a.quality.usage_count.cmp(&b.quality.usage_count),
            SortField::Recent => a.updated_at.cmp(&b.updated_at),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn generate_facets(templates: &[&IntelligentTemplate]) -> SearchFacets {
    let mut categories: BTreeMap<TemplateCategory, usize> = BTreeMap::new();
    let mut complexity: BTreeMap<TemplateComplexity, usize> = BTreeMap::new();
    let mut tags: BTreeMap<&str, usize> = BTreeMap::new();
    let mut authors: BTreeMap<&str, usize> = BTreeMap::new();

    for template in templates {
        *categories.entry(template.category).or_default() += 1;
        *complexity.entry(template.complexity).or_default() += 1;
        for tag in &template.tags {
            *tags.entry(tag.as_str()).or_default() += 1;
        }
        *authors.entry(template.author.name.as_str()).or_default() += 1;
    }

    let mut tags: Vec<FacetCount<String>> = tags
        .into_iter()
        .map(|(tag, count)| FacetCount { value: tag.to_string(), count })
        .collect();
    // Stable: equal counts stay alphabetical
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags.truncate(TOP_TAGS);

    SearchFacets {
        categories: categories
            .into_iter()
            .map(|(value, count)| FacetCount { value, count })
            .collect(),
        complexity: complexity
            .into_iter()
            .map(|(value, count)| FacetCount { value, count })
            .collect(),
        tags,
        authors: authors
            .into_iter()
            .map(|(name, count)| FacetCount { value: name.to_string(), count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(result: &TemplateSearchResult<'_>) -> Vec<String> {
        result.templates.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_returns_first_page_of_catalog() {
        let registry = TemplateRegistry::with_builtin();
        let result = search_templates(&registry, &TemplateSearchFilter::default());
        assert_eq!(result.total, registry.len());
        assert_eq!(result.templates.len(), registry.len());
    }

    #[test]
    fn test_blank_query_places_no_constraint() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            query: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(search_templates(&registry, &filter).total, registry.len());
    }

    #[test]
    fn test_query_and_category_filter() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            query: Some("SECURITY".to_string()),
            categories: vec![TemplateCategory::Rbac],
            ..Default::default()
        };
        let result = search_templates(&registry, &filter);
        assert_eq!(ids(&result), vec!["security-rbac-roles".to_string()]);
    }

    #[test]
    fn test_tag_author_and_rating_filters() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            tags: vec!["hr".to_string(), "inventory".to_string()],
            author: Some("system".to_string()),
            min_rating: Some(4.25),
            max_rating: Some(4.5),
            ..Default::default()
        };
        let result = search_templates(&registry, &filter);
        // employee (4.6) is above the range, product catalog (4.2) below
        assert_eq!(ids(&result), vec!["hr-organization-structure".to_string()]);

        let nobody = TemplateSearchFilter {
            author: Some("someone-else".to_string()),
            ..Default::default()
        };
        assert_eq!(search_templates(&registry, &nobody).total, 0);
    }

    #[test]
    fn test_sort_by_usage_descending() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            sort_by: Some(SortField::Usage),
            ..Default::default()
        };
        let result = search_templates(&registry, &filter);
        assert_eq!(result.templates[0].id, "technical-audit-trail");
        for pair in result.templates.windows(2) {
            assert!(pair[0].quality.usage_count >= pair[1].quality.usage_count);
        }
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            sort_by: Some(SortField::Name),
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let result = search_templates(&registry, &filter);
        assert_eq!(result.templates[0].name, "Audit Trail System");
    }

    #[test]
    fn test_sort_by_recency_accepts_alias() {
        let filter: TemplateSearchFilter =
            serde_json::from_str(r#"{"sort_by": "recency", "sort_order": "desc"}"#).unwrap();
        assert_eq!(filter.sort_by, Some(SortField::Recent));

        let registry = TemplateRegistry::with_builtin();
        let result = search_templates(&registry, &filter);
        assert_eq!(result.templates[0].id, "security-pii-protection");
    }

    #[test]
    fn test_pagination() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            sort_by: Some(SortField::Name),
            sort_order: SortOrder::Asc,
            offset: 2,
            limit: Some(3),
            ..Default::default()
        };
        let result = search_templates(&registry, &filter);
        assert_eq!(result.total, registry.len());
        assert_eq!(result.templates.len(), 3);

        let past_end = TemplateSearchFilter {
            offset: 100,
            ..Default::default()
        };
        let result = search_templates(&registry, &past_end);
        assert!(result.templates.is_empty());
        assert_eq!(result.total, registry.len());
    }

    #[test]
    fn test_facets_cover_filtered_set() {
        let registry = TemplateRegistry::with_builtin();
        let filter = TemplateSearchFilter {
            limit: Some(1),
            ..Default::default()
        };
        let facets = search_templates(&registry, &filter).facets;

        let category_total: usize = facets.categories.iter().map(|f| f.count).sum();
        assert_eq!(category_total, registry.len());

        let intermediate = facets
            .complexity
            .iter()
            .find(|f| f.value == TemplateComplexity::Intermediate)
            .unwrap();
        assert_eq!(intermediate.count, 4);

        assert_eq!(facets.authors, vec![FacetCount { value: "System Templates".to_string(), count: 8 }]);

        // "security" tags three templates, more than any other tag
        assert_eq!(facets.tags[0], FacetCount { value: "security".to_string(), count: 3 });
        assert!(facets.tags.len() <= 20);
        for pair in facets.tags.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }
}
