//! scanvault - company-scoped report catalog for Acunetix and ZAP scanners

use clap::Parser;
use log::debug;
use tokio_util::sync::CancellationToken;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod reconcile;
mod service;
mod store;

use cli::args::GlobalOptions;
use cli::{Cli, Commands, ReportCommands, ScanCommands, SettingCommands};
use error::Result;
use store::SettingUpdate;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling outstanding scanner calls");
            on_interrupt.cancel();
        }
    });

    let opts = GlobalOptions::from_cli(&cli, cancel);

    match cli.command {
        Commands::Init {
            company,
            email,
            name,
        } => cli::init::run(
            &opts,
            cli::init::InitArgs {
                company,
                email,
                name,
            },
        ),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("scanvault version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Setting(setting_cmd) => match setting_cmd {
            SettingCommands::Set {
                scanner,
                url,
                port,
                api_key,
            } => cli::setting::set(
                &opts,
                scanner,
                SettingUpdate {
                    scanner_url: url,
                    scanner_port: port,
                    api_key,
                },
            ),
            SettingCommands::Show => cli::setting::show(&opts),
        },
        Commands::Scan(scan_cmd) => match scan_cmd {
            ScanCommands::List => cli::scan::list(&opts).await,
        },
        Commands::Report(report_cmd) => match report_cmd {
            ReportCommands::List { backend } => cli::report::list(&opts, backend).await,
            ReportCommands::Catalog { backend } => cli::report::catalog(&opts, backend),
            ReportCommands::Create { targets } => cli::report::create(&opts, &targets).await,
            ReportCommands::Generate { title, sites } => {
                cli::report::generate(&opts, &title, &sites).await
            }
        },
    }
}
