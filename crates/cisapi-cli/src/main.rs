//! cisapi - command line client for the CIS Automotive API
//!
//! Stores credentials, lists the documented endpoints and calls any endpoint
//! with `key=value` parameters. With `--state` the client state (credentials,
//! bearer token, auth mode) is read before the command and written back
//! after it, so consecutive invocations reuse one token.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use cisapi_client::CisClient;
use cisapi_common::{
    AuthMode, ClientConfig, ClientSnapshot, Credentials, DEFAULT_CREDENTIALS_FILE, DEFAULT_STAGE,
    DEFAULT_TIMEOUT_SECONDS,
};

mod commands;
mod display;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Credentials file (INI, one section per stage)
    #[arg(long, global = true, default_value = DEFAULT_CREDENTIALS_FILE)]
    config: PathBuf,

    /// Section of the credentials file to use
    #[arg(long, global = true, default_value = DEFAULT_STAGE)]
    stage: String,

    /// API key; overrides the credentials file (or set CIS_API_KEY)
    #[arg(
        long,
        global = true,
        env = "CIS_API_KEY",
        hide_env_values = true,
        requires = "api_id"
    )]
    api_key: Option<String>,

    /// API key ID (or set CIS_API_ID)
    #[arg(long, global = true, env = "CIS_API_ID", requires = "api_key")]
    api_id: Option<String>,

    /// Go through the first API marketplace proxy
    #[arg(long, global = true)]
    proxy_a: bool,

    /// Go through the second API marketplace proxy
    #[arg(long, global = true)]
    proxy_b: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,

    /// Read client state from this file before the command and write it back after
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Do not attach the bearer token
    #[arg(long, global = true)]
    no_jwt: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the API key and ID to the credentials file
    Configure,

    /// List the documented endpoints and their parameters
    Endpoints {
        /// Only show endpoints whose name contains this text
        filter: Option<String>,
    },

    /// Call an endpoint and print the JSON response
    Call {
        /// Endpoint name, e.g. getRegions
        endpoint: String,

        /// Parameters as key=value pairs
        params: Vec<String>,

        /// Send even if required parameters are missing
        #[arg(long)]
        force: bool,

        /// Print the response on a single line
        #[arg(long)]
        compact: bool,
    },
}

impl Args {
    fn explicit_credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.api_id) {
            (Some(key), Some(id)) => Some(Credentials::new(key.as_str(), id.as_str())),
            _ => None,
        }
    }

    fn auth_mode(&self) -> Result<AuthMode> {
        AuthMode::from_flags(self.proxy_a, self.proxy_b)
            .context("--proxy-a and --proxy-b cannot be used together")
    }

    fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::new()
            .with_timeout(self.timeout)
            .with_auth_mode(self.auth_mode()?))
    }
}

/// Create the client from the state file if there is one, else from credentials.
fn build_client(args: &Args) -> Result<CisClient> {
    let config = args.client_config()?;

    let snapshot = match &args.state {
        Some(path) if path.exists() => Some(read_state(path)?),
        _ => None,
    };

    let Some(snapshot) = snapshot else {
        let builder = CisClient::builder().config(config);
        let builder = match args.explicit_credentials() {
            Some(credentials) => builder.credentials(credentials),
            None => builder.credentials_file(&args.config, &args.stage),
        };
        return builder.build().context("Failed to create client");
    };

    let mut client =
        CisClient::from_snapshot(config, snapshot).context("Failed to restore client state")?;

    if let Some(credentials) = args.explicit_credentials() {
        client.set_credentials(credentials);
    } else if client.credentials().is_none() {
        client
            .load_credentials(&args.config, &args.stage)
            .with_context(|| format!("No credentials in state or {}", args.config.display()))?;
    }

    if args.proxy_a || args.proxy_b {
        client.set_auth_mode(args.auth_mode()?);
    }

    Ok(client)
}

fn read_state(path: &Path) -> Result<ClientSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    let snapshot = serde_json::from_str(&json)
        .with_context(|| format!("Invalid state file {}", path.display()))?;
    debug!("Imported client state from {}", path.display());
    Ok(snapshot)
}

fn write_state(path: &Path, snapshot: &ClientSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write state file {}", path.display()))?;
    debug!("Exported client state to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.command {
        Command::Configure => commands::configure(&args),
        Command::Endpoints { filter } => {
            commands::list_endpoints(filter.as_deref());
            Ok(())
        }
        Command::Call {
            endpoint,
            params,
            force,
            compact,
        } => {
            let params = commands::parse_params(params)?;
            let mut client = build_client(&args)?;

            let result = commands::call(
                &mut client,
                endpoint,
                params,
                !args.no_jwt,
                *force,
                *compact,
            )
            .await;

            // The token may have been refreshed even if the call failed
            if let Some(path) = &args.state {
                write_state(path, &client.snapshot())?;
            }

            result
        }
    }
}
