//! Command implementations for the CLI.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use log::warn;

use cisapi_client::{ApiError, CisClient, ENDPOINTS, catalog, credentials};
use cisapi_common::{ParamValue, Params};

use crate::Args;
use crate::display::{display_endpoint, display_json};

/// Writes the credentials given on the command line to the credentials file.
pub fn configure(args: &Args) -> Result<()> {
    let credentials = args
        .explicit_credentials()
        .context("Both --api-key and --api-id (or CIS_API_KEY and CIS_API_ID) are required")?;

    credentials::save(&args.config, &credentials, &args.stage)?;

    println!(
        "{} Saved credentials for stage {} to {}",
        "✓".bright_green(),
        args.stage.bright_cyan(),
        args.config.display()
    );
    Ok(())
}

/// Prints the endpoint catalog.
pub fn list_endpoints(filter: Option<&str>) {
    let filter = filter.map(str::to_lowercase);
    for spec in ENDPOINTS {
        if filter
            .as_deref()
            .is_none_or(|f| spec.name.to_lowercase().contains(f))
        {
            display_endpoint(spec);
        }
    }
}

/// Parses one `key=value` argument.
///
/// `true` and `false` in any case become booleans so they reach the API in
/// its expected spelling; everything else is sent verbatim.
pub fn parse_param(arg: &str) -> Result<(String, ParamValue)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("Parameter '{arg}' is not in key=value form");
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("Parameter '{arg}' has an empty name");
    }

    let value = if value.eq_ignore_ascii_case("true") {
        ParamValue::Bool(true)
    } else if value.eq_ignore_ascii_case("false") {
        ParamValue::Bool(false)
    } else {
        ParamValue::from(value)
    };

    Ok((key.to_string(), value))
}

/// Parses all `key=value` arguments, later keys overriding earlier ones.
pub fn parse_params(args: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for arg in args {
        let (key, value) = parse_param(arg)?;
        params.insert(key, value);
    }
    Ok(params)
}

/// Calls an endpoint and prints the response.
pub async fn call(
    client: &mut CisClient,
    endpoint: &str,
    params: Params,
    include_bearer_auth: bool,
    force: bool,
    compact: bool,
) -> Result<()> {
    match catalog::find(endpoint) {
        Some(spec) => {
            let report = spec.check(&params);
            if !report.missing.is_empty() && !force {
                bail!(
                    "{endpoint} requires {}; pass --force to send anyway",
                    report.missing.join(", ")
                );
            }
            if !report.unknown.is_empty() {
                warn!(
                    "{endpoint} does not document {}; sending anyway",
                    report.unknown.join(", ")
                );
            }
        }
        None => warn!("{endpoint} is not a documented endpoint; sending as is"),
    }

    let response = match client.call_with(endpoint, params, include_bearer_auth).await {
        Ok(response) => response,
        Err(e) => {
            if e.is_authorization_error() {
                eprintln!(
                    "{} check that the auth mode matches where the key was issued \
                     (--proxy-a, --proxy-b) and that the subscription covers {endpoint}",
                    "Hint:".bright_yellow()
                );
            } else if matches!(e, ApiError::AuthRefreshFailed(_)) {
                eprintln!(
                    "{} check that the API key and ID are correct and the account is active",
                    "Hint:".bright_yellow()
                );
            }
            return Err(e).with_context(|| format!("Call to {endpoint} failed"));
        }
    };

    display_json(&response, compact)
}
