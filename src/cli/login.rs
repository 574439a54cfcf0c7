//! Login command implementation

use colored::Colorize;

use carson_living::Result;

use crate::cli::{CommandContext, GlobalOptions};

/// Force a fresh login with the stored credentials and save the new token
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;

    ctx.auth.update_token()?;
    ctx.persist_token()?;

    let expires = ctx
        .auth
        .token_expires_at()
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    println!(
        "{} Logged in as {} (token expires {})",
        "✓".green(),
        ctx.auth.username().bold(),
        expires
    );

    Ok(())
}
