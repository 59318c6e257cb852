//! Scan command implementations

use log::debug;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::models::ScanDisplay;
use crate::output::{Formattable, print_warnings, progress};

/// List every Acunetix scan for the company
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let spinner = progress::spinner(ctx.format, "Fetching scans...");
    let result = ctx.service.list_acunetix_scans(ctx.user_id, &ctx.cancel).await;
    spinner.finish_and_clear();
    let set = result?;

    debug!("Fetched {} scans over {} pages", set.items.len(), set.pages);

    let rows: Vec<ScanDisplay> = set.items.into_iter().map(ScanDisplay::from).collect();
    rows.print(ctx.format)?;
    print_warnings(&set.warnings);

    Ok(())
}
