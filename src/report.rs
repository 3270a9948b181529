//! Plain-text summary of an application result

use crate::apply::ApplicationResult;

/// Deterministic, line-oriented report; sections without content are omitted
pub fn generate_application_report(result: &ApplicationResult) -> String {
    let mut lines = vec![
        "Template Application Report".to_string(),
        "===========================".to_string(),
        format!("Template: {} v{}", result.template.name, result.template.version),
        format!("Status: {}", if result.success { "SUCCESS" } else { "FAILED" }),
        format!("Applied Elements: {}", result.applied_elements.len()),
    ];

    if !result.conflicts.is_empty() {
        lines.push(String::new());
        lines.push(format!("Conflicts Resolved: {}", result.conflicts.len()));
        for applied in &result.conflicts {
            lines.push(format!(
                "  - {} ({}): {}",
                applied.conflict.template.name, applied.conflict.conflict_type, applied.resolution
            ));
        }
    }

    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push(format!("Warnings: {}", result.warnings.len()));
        lines.extend(result.warnings.iter().map(|w| format!("  - {}", w)));
    }

    if let Some(performance) = &result.performance {
        let m = &performance.metrics;
        lines.push(String::new());
        lines.push(format!("Performance Impact: {}", performance.estimated_impact.as_str()));
        lines.push(format!("  element_count_change: {}", m.element_count_change));
        lines.push(format!("  field_count_change: {}", m.field_count_change));
        lines.push(format!("  relationship_count_change: {}", m.relationship_count_change));
        lines.push(format!("  complexity_increase: {:.2}", m.complexity_increase));
        lines.push(format!("  structural_complexity_change: {:.1}", m.structural_complexity_change));
    }

    if let Some(validation) = &result.validation_results {
        lines.push(String::new());
        if validation.valid {
            lines.push(format!("Validation: PASSED ({} warnings)", validation.warnings.len()));
        } else {
            lines.push(format!("Validation: FAILED ({} errors)", validation.errors.len()));
        }
        lines.extend(validation.errors.iter().map(|e| format!("  - error: {}", e)));
        lines.extend(validation.warnings.iter().map(|w| format!("  - warning: {}", w)));
    }

    if let Some(error) = &result.error {
        lines.push(String::new());
        lines.push(format!("Error: {}", error));
    }

    lines.join("\n")
}
