//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use carson_living::config::Config;
use carson_living::{CarsonAuth, Result};

use crate::cli::GlobalOptions;

/// Run the init command
///
/// Prompts for credentials, logs in once to prove them, and saves both the
/// credentials and the obtained token.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to Carson!".bold().green());
    println!("Let's set up your Carson Living account.\n");

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Email")
        .interact_text()?;

    let password: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    println!("\n{}", "Authenticating...".cyan());
    let host = opts.api_host_ref().or(config.api_host.as_deref());
    let mut auth = CarsonAuth::with_config(
        username.as_str(),
        password.as_str(),
        None,
        config.api_config(host),
    )?;
    auth.update_token()?;

    println!("{}", "✓ Authentication successful!".green());

    config.username = Some(username);
    config.password = Some(password);
    config.token = auth.token().map(str::to_string);
    if opts.api_host.is_some() {
        config.api_host = opts.api_host.clone();
    }

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "carson status".cyan());
    println!("  {} - Show your account", "carson query me/".cyan());

    Ok(())
}
