//! Drafts folder routing command.

#![allow(clippy::format_push_string)]

use anyhow::{Context, Result};
use clap::Args;
use ifrit_content::{scan_drafts_dir, PendingImport, PendingImports};
use ifrit_core::AppConfig;

/// Arguments for the route-drafts command.
#[derive(Args, Debug, Clone)]
pub struct RouteDraftsArgs {
    /// Drafts folder (defaults to content.drafts_dir)
    #[arg(long)]
    pub dir: Option<String>,
}

/// Scans `dir` and queues every markdown draft for review.
pub fn queue_drafts(dir: &str) -> Result<PendingImports> {
    let drafts = scan_drafts_dir(dir).with_context(|| format!("failed to scan drafts in {dir}"))?;
    let mut queue = PendingImports::default();
    for (file_name, source) in drafts {
        queue.add(file_name, &source);
    }
    Ok(queue)
}

#[must_use]
pub fn format_routing_report(imports: &[PendingImport]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\nDraft routing ({} files)\n", imports.len()));
    output.push_str(&"─".repeat(63));
    output.push('\n');
    if imports.is_empty() {
        output.push_str("No markdown drafts found.\n");
        return output;
    }

    output.push_str(&format!("{:<28} {:<14} {:>5}  Title\n", "File", "Category", "Conf"));
    for item in imports {
        let rec = &item.recommendation;
        let category = if rec.explicit {
            format!("{}*", rec.category)
        } else {
            rec.category.to_string()
        };
        output.push_str(&format!(
            "{:<28} {:<14} {:>4}%  {}\n",
            item.file_name,
            category,
            rec.confidence,
            item.title.as_deref().unwrap_or("-")
        ));
    }
    output.push_str("\n* category set in frontmatter\n");
    output
}

/// Runs the route-drafts command.
///
/// # Errors
/// Returns an error if the drafts folder cannot be read.
pub fn run_route_drafts(args: &RouteDraftsArgs, config: &AppConfig) -> Result<()> {
    let dir = args.dir.as_deref().unwrap_or(&config.content.drafts_dir);
    let queue = queue_drafts(dir)?;
    tracing::info!(dir, pending = queue.pending().count(), "Routed drafts");
    println!("{}", format_routing_report(queue.all()));
    Ok(())
}
