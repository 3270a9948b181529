//! schema-templates CLI
//!
//! Command-mode front end over `TemplateService`.
//!
//! Run with: cargo run -- --list
//! Logging: RUST_LOG=schema_templates=debug

use anyhow::{bail, Context, Result};
use schema_templates::{
    recommend::DEFAULT_RECOMMENDATION_LIMIT, ApplicationConfig, MetaContractElement,
    RecommendationContext, TemplateSearchFilter, TemplateService,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: schema-templates <command> [--catalog-dir=<dir>]

Commands:
  --list                                        List catalog templates
  --search <query>                              Free-text search
  --recommend <context.json> [--limit=N]        Ranked recommendations
  --preview <template-id> <elements.json>       Conflicts and impact
  --apply <template-id> <elements.json> [--config=<config.json>] [--json]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let positional: Vec<&str> = args
        .iter()
        .skip(1)
        .map(|s| s.as_str())
        .filter(|a| !a.starts_with("--") || is_command(a))
        .collect();

    let mut service = TemplateService::init();
    if let Some(dir) = flag_value(&args, "--catalog-dir=") {
        service.load_catalog_dir(Path::new(dir))?;
    }

    // COMMAND MODE
    match positional.first().copied() {
        Some("--list") => run_list(&service),
        Some("--search") => {
            let query = positional[1..].join(" ");
            run_search(&service, &query)
        }
        Some("--recommend") => {
            let path = positional.get(1).context("Usage: --recommend <context.json> [--limit=N]")?;
            let limit = match flag_value(&args, "--limit=") {
                Some(n) => n.parse().with_context(|| format!("Invalid --limit value: {}", n))?,
                None => DEFAULT_RECOMMENDATION_LIMIT,
            };
            run_recommend(&service, path, limit)
        }
        Some("--preview") => {
            let (Some(id), Some(path)) = (positional.get(1), positional.get(2)) else {
                bail!("Usage: --preview <template-id> <elements.json>");
            };
            run_preview(&service, id, path)
        }
        Some("--apply") => {
            let (Some(id), Some(path)) = (positional.get(1), positional.get(2)) else {
                bail!("Usage: --apply <template-id> <elements.json> [--config=<config.json>] [--json]");
            };
            let json_output = args.iter().any(|a| a == "--json");
            run_apply(&service, id, path, flag_value(&args, "--config="), json_output)
        }
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn is_command(arg: &str) -> bool {
    matches!(arg, "--list" | "--search" | "--recommend" | "--preview" | "--apply")
}

fn flag_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter().find_map(|a| a.strip_prefix(prefix))
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path))
}

fn run_list(service: &TemplateService) -> Result<()> {
    println!("\n┌─────────────────────────────────────────────────────────────┐");
    println!("│ SCHEMA TEMPLATE CATALOG                                     │");
    println!("└─────────────────────────────────────────────────────────────┘\n");

    for t in service.registry().get_all() {
        println!(
            "  • {} [{} / {}] - {} ({} elements)",
            t.id,
            t.category,
            t.complexity,
            t.name,
            t.elements().len()
        );
    }
    Ok(())
}

fn run_search(service: &TemplateService, query: &str) -> Result<()> {
    let filter = TemplateSearchFilter {
        query: Some(query.to_string()),
        ..Default::default()
    };
    let result = service.search_templates(&filter);

    if result.templates.is_empty() {
        println!("No templates found for: {}", query);
        return Ok(());
    }

    println!("{} template(s) match \"{}\":\n", result.total, query);
    for t in &result.templates {
        println!("  • {} - {}", t.id, t.description);
        println!(
            "    rating {:.1}, used by {} projects, tags: {}",
            t.quality.community_rating,
            t.quality.usage_count,
            t.tags.join(", ")
        );
    }
    Ok(())
}

fn run_recommend(service: &TemplateService, context_path: &str, limit: usize) -> Result<()> {
    let context: RecommendationContext = read_json(context_path)?;
    tracing::info!("Recommending for context {:?}", context_path);
    let recommendations = service.get_recommendations(&context, limit);

    if recommendations.is_empty() {
        println!("No compatible templates for this context.");
        return Ok(());
    }

    for (i, rec) in recommendations.iter().enumerate() {
        println!("{}. {} (score: {:.1})", i + 1, rec.template.name, rec.score);
        println!(
            "   compatibility: {}, conflict risk: {:?}",
            rec.compatibility.as_str(),
            rec.conflict_risk
        );
        for reason in &rec.reasons {
            println!("   • {}", reason);
        }
        println!();
    }
    Ok(())
}

fn run_preview(service: &TemplateService, id: &str, elements_path: &str) -> Result<()> {
    let existing: Vec<MetaContractElement> = read_json(elements_path)?;
    let preview = service.preview_by_id(id, &existing, None)?;

    println!("Preview of {} on {} existing elements\n", id, existing.len());
    println!("  Added:     {}", preview.impact.added);
    println!("  Modified:  {}", preview.impact.modified);
    println!("  Conflicts: {}", preview.impact.conflicts);
    println!("  Impact:    {}", preview.impact.estimated_performance_impact.as_str());

    if !preview.conflicts.is_empty() {
        println!("\nCONFLICTS:");
        for c in &preview.conflicts {
            println!(
                "  • [{:?}] {} - {} (suggested: {})",
                c.severity, c.id, c.description, c.suggested_resolution
            );
        }
    }
    Ok(())
}

fn run_apply(
    service: &TemplateService,
    id: &str,
    elements_path: &str,
    config_path: Option<&str>,
    json_output: bool,
) -> Result<()> {
    let existing: Vec<MetaContractElement> = read_json(elements_path)?;
    let config: ApplicationConfig = match config_path {
        Some(path) => read_json(path)?,
        None => ApplicationConfig::default(),
    };

    let result = service.apply_by_id(id, &existing, &config)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", service.generate_application_report(&result));
    }

    if !result.success {
        bail!(result.error.unwrap_or_else(|| "Template application failed".to_string()));
    }
    Ok(())
}
