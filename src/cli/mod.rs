//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};

pub mod context;
pub mod init;
pub mod login;
pub mod query;
pub mod status;

pub use context::CommandContext;

/// Carson - command-line client for the Carson Living API
#[derive(Parser, Debug)]
#[command(name = "carson")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "CARSON_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CARSON_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Custom API host for development/testing
    #[arg(long, global = true, env = "CARSON_API_HOST", hide_env = true)]
    pub api_host: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store credentials and log in
    Init,

    /// Refresh the cached token
    Login,

    /// Show authentication and configuration status
    Status,

    /// Run an authenticated API query and print the response
    Query(QueryArgs),

    /// Display version information
    Version,
}

/// Arguments for `carson query`
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Endpoint path relative to the API root (e.g. `me/`) or an absolute URL
    pub path: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Query parameter as KEY=VALUE (repeatable)
    #[arg(long = "param", short = 'p', value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Re-logins allowed when the server answers 401
    #[arg(long)]
    pub retry_auth: Option<u32>,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    Ok((key.to_string(), value.to_string()))
}

/// Global CLI options passed to all command handlers
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Custom config file path (defaults to ~/.carson/config.yaml)
    pub config: Option<String>,

    /// Custom API host for development/testing
    pub api_host: Option<String>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            api_host: cli.api_host.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_host_ref(&self) -> Option<&str> {
        self.api_host.as_deref()
    }
}
