//! Status command implementation

use colored::Colorize;

use carson_living::Result;
use carson_living::config::Config;

use crate::cli::GlobalOptions;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Carson Configuration Status".bold());

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "carson init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());
    println!();

    match (&config.username, &config.password) {
        (Some(username), Some(_)) => {
            println!("{} Credentials configured for {}", "✓".green(), username);
        }
        _ => {
            println!("{} Credentials not configured", "✗".red());
            println!("  → Run 'carson init' to configure");
        }
    }

    match config.cached_token() {
        Some(token) if !token.is_expired() => {
            let remaining = token
                .expires_at()
                .map(|at| at.signed_duration_since(chrono::Utc::now()))
                .unwrap_or_else(chrono::Duration::zero);
            let hours = remaining.num_hours();
            let mins = remaining.num_minutes() % 60;

            println!(
                "{} JWT token valid (expires in {}h {}m)",
                "✓".green(),
                hours,
                mins
            );

            let claims = token.payload();
            if let Some(user_id) = claims.user_id() {
                println!("  User ID: {}", claim_text(user_id));
            }
            if let Some(username) = claims.username() {
                println!("  Username: {}", claim_text(username));
            }
            if let Some(email) = claims.email() {
                println!("  Email: {}", claim_text(email));
            }
        }
        Some(_) => {
            println!(
                "{} JWT token expired (will refresh on next command)",
                "⚠".yellow()
            );
        }
        None => {
            println!(
                "{} JWT token not cached (will authenticate on next command)",
                "○".dimmed()
            );
        }
    }

    let api = config.api_config(opts.api_host_ref());
    println!("{} API endpoint: {}", "○".dimmed(), api.api_url().cyan());

    println!();

    Ok(())
}

/// Strings print bare, anything else as JSON
fn claim_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
