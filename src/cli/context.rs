//! Command execution context
//!
//! Loads the config, builds the authenticator from it, and writes refreshed
//! tokens back so later runs can skip the login round trip.

use log::debug;

use carson_living::config::Config;
use carson_living::{CarsonAuth, Result};

use crate::cli::GlobalOptions;

/// Config plus an authenticator built from it
pub struct CommandContext {
    pub config: Config,
    pub auth: CarsonAuth,
    config_path: Option<String>,
}

impl CommandContext {
    /// Load config and create the authenticator.
    ///
    /// A cached token is reused when it still decodes; the authenticator logs
    /// in on its own when it is missing or expired.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        config.validate_auth()?;

        let auth = config.authenticator(opts.api_host_ref())?;

        Ok(Self {
            config,
            auth,
            config_path: opts.config.clone(),
        })
    }

    /// Re-login budget from config (or the default)
    pub fn retry_auth(&self) -> u32 {
        self.auth.config().retry_auth
    }

    /// Save the authenticator's token if it differs from the cached one
    pub fn persist_token(&mut self) -> Result<()> {
        let current = self.auth.token().map(str::to_string);
        if current == self.config.token {
            return Ok(());
        }

        debug!("Saving refreshed token to config");
        self.config.token = current;
        self.config.save_at(self.config_path.as_deref())
    }
}
