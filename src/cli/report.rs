//! Report command implementations

use colored::Colorize;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::BackendKind;
use crate::error::Result;
use crate::models::{CatalogDisplay, RemoteReportDisplay};
use crate::output::{Formattable, json, print_warnings, progress};

/// List reports for a backend.
///
/// Acunetix is walked remotely; ZAP keeps no listing of its own, so its
/// reports come from the catalog.
pub async fn list(opts: &GlobalOptions, backend: BackendKind) -> Result<()> {
    match backend {
        BackendKind::Acunetix => list_remote(opts, backend).await,
        BackendKind::Zap => catalog(opts, Some(backend)),
    }
}

async fn list_remote(opts: &GlobalOptions, backend: BackendKind) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let spinner = progress::spinner(ctx.format, "Fetching reports...");
    let result = ctx
        .service
        .list_remote_reports(ctx.user_id, backend, &ctx.cancel)
        .await;
    spinner.finish_and_clear();
    let set = result?;

    debug!("Fetched {} reports over {} pages", set.items.len(), set.pages);

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&set)?),
        OutputFormat::Table => {
            let rows: Vec<RemoteReportDisplay> = set
                .items
                .into_iter()
                .map(RemoteReportDisplay::from)
                .collect();
            rows.print(ctx.format)?;
            print_warnings(&set.warnings);
        }
    }

    Ok(())
}

/// List catalog rows for the user's company, optionally for one backend
pub fn catalog(opts: &GlobalOptions, backend: Option<BackendKind>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let kinds = match backend {
        Some(kind) => vec![kind],
        None => vec![BackendKind::Acunetix, BackendKind::Zap],
    };

    let mut rows = Vec::new();
    for kind in kinds {
        let reports = ctx.service.list_reports(ctx.user_id, kind)?;
        rows.extend(reports.into_iter().map(CatalogDisplay::from));
    }

    rows.print(ctx.format)
}

/// Ask Acunetix to build a report from the scans of the given targets
pub async fn create(opts: &GlobalOptions, targets: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let spinner = progress::spinner(ctx.format, "Resolving targets and creating report...");
    let result = ctx
        .service
        .create_acunetix_report(ctx.user_id, targets, &ctx.cancel)
        .await;
    spinner.finish_and_clear();
    let created = result?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&created)?),
        OutputFormat::Table => {
            println!(
                "{} Report requested for {} scan(s)",
                "✓".green(),
                created.resolution.scan_ids.len()
            );
            for target in &created.resolution.skipped {
                eprintln!("{} No scan found for {}", "⚠".yellow(), target);
            }
            print_warnings(&created.warnings);
        }
    }

    Ok(())
}

/// Generate a ZAP report and record it in the catalog
pub async fn generate(opts: &GlobalOptions, title: &str, sites: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let spinner = progress::spinner(ctx.format, "Generating report...");
    let result = ctx
        .service
        .generate_report(ctx.user_id, BackendKind::Zap, title, sites, &ctx.cancel)
        .await;
    spinner.finish_and_clear();
    let outcome = result?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&outcome)?),
        OutputFormat::Table => {
            println!(
                "{} Report generated: {}",
                "✓".green(),
                outcome.report.artifact_path.bold()
            );
            if let Some(persisted) = &outcome.persisted {
                println!("  Catalog ID: {}", persisted.id);
            }
        }
    }
    print_warnings(&outcome.warnings);

    Ok(())
}
