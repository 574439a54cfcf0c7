//! Query command implementation

use log::debug;

use carson_living::{ConfigError, Method, Result};

use crate::cli::{CommandContext, GlobalOptions, QueryArgs};

/// Run an authenticated query and print the response body.
///
/// JSON bodies are pretty-printed; anything else is printed as-is. A token
/// refreshed along the way is saved, even when the query itself fails.
pub fn run(opts: &GlobalOptions, args: &QueryArgs) -> Result<()> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .map_err(|_| ConfigError::Invalid(format!("Unknown HTTP method: {}", args.method)))?;

    let mut ctx = CommandContext::new(opts)?;
    let retry_auth = args.retry_auth.unwrap_or_else(|| ctx.retry_auth());

    let params: Vec<(&str, &str)> = args
        .params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    debug!("{} {} (retry_auth={})", method, args.path, retry_auth);
    let result = ctx
        .auth
        .authenticated_query(&args.path, method, &params, retry_auth);
    ctx.persist_token()?;

    let body = result?
        .text()
        .map_err(|e| carson_living::ApiError::InvalidResponse(e.to_string()))?;

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", body),
    }

    Ok(())
}
