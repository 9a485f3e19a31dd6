//! Brand Market Report Demo
//!
//! Pulls supply, pricing and top model figures for one brand in one region
//! and prints them as a single JSON document.
//!
//! # Usage
//!
//! ```bash
//! # Credentials from CIS_API_CREDS.txt
//! cargo run --example brand_report -- --brand FORD
//!
//! # Explicit credentials, another region
//! cargo run --example brand_report -- \
//!     --api-key ... --api-id ... \
//!     --brand TOYOTA --region REGION_STATE_NY
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use cisapi_client::{CisClient, DEFAULT_REGION};
use cisapi_common::Credentials;

#[derive(Parser, Debug)]
#[command(author, version, about = "CIS Automotive brand market report")]
struct Args {
    /// API key; read from the credentials file when omitted
    #[arg(long, env = "CIS_API_KEY", requires = "api_id")]
    api_key: Option<String>,

    /// API key ID
    #[arg(long, env = "CIS_API_ID")]
    api_id: Option<String>,

    /// Brand to report on
    #[arg(long, default_value = "FORD")]
    brand: String,

    /// Region to report on
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = CisClient::builder();
    if let (Some(key), Some(id)) = (args.api_key, args.api_id) {
        builder = builder.credentials(Credentials::new(key, id));
    }
    let mut client = builder.build().context("Failed to create client")?;

    let days_to_sell = client.days_to_sell(&args.brand, &args.region).await?;
    let days_supply = client.days_supply(&args.brand, &args.region).await?;
    let list_price = client.list_price(&args.brand, &args.region).await?;
    let sale_price = client.sale_price(&args.brand, &args.region).await?;
    let top_models = client.top_models(&args.region).await?;

    let report = json!({
        "brand": args.brand,
        "region": args.region,
        "daysToSell": days_to_sell,
        "daysSupply": days_supply,
        "listPrice": list_price,
        "salePrice": sale_price,
        "topModels": top_models,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
