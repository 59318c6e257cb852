//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::open_store;
use crate::client::BackendKind;
use crate::config::Config;
use crate::error::Result;
use crate::store::Directory;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "scanvault Configuration Status".bold());

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "scanvault init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    let config_path = Config::resolve_path(opts.config_ref())?;
    let db_path = config.database_path(opts.db_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());
    println!("Catalog:     {}", db_path.display().to_string().cyan());
    println!();

    let Some(user_id) = config.user_id else {
        println!("{} No acting user configured", "✗".red());
        println!("  → Run 'scanvault init' to register one");
        println!();
        return Ok(());
    };

    let store = open_store(&config, opts.db_ref())?;
    let user = match store.user(user_id) {
        Ok(user) => user,
        Err(e) => {
            println!("{} User {} not found in catalog: {}", "✗".red(), user_id, e);
            println!("  → Run 'scanvault init' again");
            println!();
            return Ok(());
        }
    };

    let company = store.company(user.company_id)?;
    println!("{} User: {} ({})", "✓".green(), user.email, user.name);
    println!("{} Company: {}", "✓".green(), company.name);

    let settings = store.scanner_settings(company.id)?;
    for kind in [BackendKind::Acunetix, BackendKind::Zap] {
        match settings.iter().find(|s| s.scanner == kind) {
            Some(s) if !s.scanner_url.is_empty() => {
                let key = if s.api_key.is_empty() {
                    " (no API key)".yellow().to_string()
                } else {
                    String::new()
                };
                println!("{} {}: {}{}", "✓".green(), kind, s.base_url(), key);
            }
            _ => {
                println!("{} {} not configured", "○".dimmed(), kind);
                println!(
                    "  → Run 'scanvault setting set {}' to configure",
                    kind.tag().to_lowercase()
                );
            }
        }
    }

    println!();
    Ok(())
}
