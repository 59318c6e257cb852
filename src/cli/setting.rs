//! Scanner setting command implementations

use colored::Colorize;
use log::debug;

use crate::cli::{CommandContext, OutputFormat};
use crate::cli::args::GlobalOptions;
use crate::client::BackendKind;
use crate::error::Result;
use crate::models::SettingDisplay;
use crate::output::Formattable;
use crate::store::SettingUpdate;

/// Create or partially update the company's settings for one scanner
pub fn set(opts: &GlobalOptions, scanner: BackendKind, update: SettingUpdate) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let user = ctx.user()?;

    debug!("Updating {} settings for company {}", scanner, user.company_id);
    let setting = ctx
        .store
        .upsert_scanner_setting(user.company_id, scanner, &update)?;

    let rows = vec![SettingDisplay::from(setting)];
    if ctx.format == OutputFormat::Table {
        println!("{} {} settings saved", "✓".green(), scanner);
    }
    rows.print(ctx.format)
}

/// Show every scanner configured for the company
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let user = ctx.user()?;

    let rows: Vec<SettingDisplay> = ctx
        .store
        .scanner_settings(user.company_id)?
        .into_iter()
        .map(SettingDisplay::from)
        .collect();

    rows.print(ctx.format)
}
