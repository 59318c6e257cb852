//! Init command implementation

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::cli::context::open_store;
use crate::config::Config;
use crate::error::Result;

/// Identity values supplied on the command line; missing ones are prompted for
#[derive(Debug, Default)]
pub struct InitArgs {
    pub company: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Run the init command
pub fn run(opts: &GlobalOptions, args: InitArgs) -> Result<()> {
    println!("{}", "Welcome to scanvault!".bold().green());

    let company = value_or_prompt(args.company, "Company name")?;
    let email = value_or_prompt(args.email, "Your email")?;
    let name = value_or_prompt(args.name, "Your name")?;

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();
    if let Some(db) = opts.db_ref() {
        config.database = Some(PathBuf::from(db));
    }

    let store = open_store(&config, None)?;
    let company = store.get_or_create_company(company.trim())?;
    let user = store.register_user(email.trim(), name.trim(), company.id)?;

    let company = if user.company_id != company.id {
        println!(
            "{} {} is already registered with another company; keeping that membership.",
            "⚠".yellow(),
            user.email
        );
        store.company(user.company_id)?
    } else {
        company
    };

    config.user_id = Some(user.id);
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );
    println!("  User: {} ({})", user.email.bold(), user.id);
    println!("  Company: {}", company.name.bold());

    println!("\n{}", "Next, point scanvault at your scanners:".bold());
    println!(
        "  {}",
        "scanvault setting set acunetix --url https://acunetix.internal --port 3443 --api-key <KEY>"
            .cyan()
    );
    println!(
        "  {}",
        "scanvault setting set zap --url http://zap.internal --port 8080 --api-key <KEY>".cyan()
    );

    Ok(())
}

fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()?),
    }
}
