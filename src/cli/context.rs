//! Command execution context
//!
//! Loads the config, opens the catalog, and wires the report service so
//! command handlers start from a ready-to-use acting user.

use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::HttpTransport;
use crate::config::Config;
use crate::error::Result;
use crate::service::ReportService;
use crate::store::{Directory, Store, User};

/// Context for command execution
pub struct CommandContext {
    pub store: Arc<Store>,
    pub service: ReportService,
    pub format: OutputFormat,
    pub user_id: Uuid,
    pub cancel: CancellationToken,
}

impl CommandContext {
    /// Build the context for a command that acts on behalf of the configured user.
    ///
    /// # Errors
    /// Fails when the config is missing, no user has been registered, or the
    /// catalog cannot be opened.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let user_id = config.require_user()?;
        let store = Arc::new(open_store(&config, opts.db_ref())?);

        let transport = Arc::new(HttpTransport::new(&config.http)?);
        let service = ReportService::new(store.clone(), store.clone(), transport)
            .with_page_size(config.preferences.page_size);

        Ok(Self {
            format: opts.resolve_format(config.preferences.format),
            store,
            service,
            user_id,
            cancel: opts.cancel.clone(),
        })
    }

    /// The acting user as currently stored
    pub fn user(&self) -> Result<User> {
        Ok(self.store.user(self.user_id)?)
    }
}

/// Open the catalog at the override path, the configured path, or the default
pub fn open_store(config: &Config, db_override: Option<&str>) -> Result<Store> {
    let path = config.database_path(db_override)?;
    debug!("Opening catalog at {}", path.display());
    Ok(Store::open_at(&path)?)
}
