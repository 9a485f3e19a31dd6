//! # cisapi-client
//!
//! Async client for the CIS Automotive API.
//!
//! The crate is built around [`CisClient`], a gateway that manages the API
//! credentials and the short-lived bearer token, and exposes:
//! - one typed method per documented endpoint (vehicle valuation, sales,
//!   pricing, dealer listings, VIN decoding and so on)
//! - [`CisClient::call`] for any endpoint by name
//! - snapshots of the client state to share a token between workers
//!
//! Three auth modes are supported: direct access with a bearer token
//! exchanged for the API key, and two API marketplace proxies that take the
//! API key in a header instead.
//!
//! ## Example
//!
//! ```no_run
//! use cisapi_client::{CisClient, DEFAULT_REGION};
//!
//! # async fn example() -> Result<(), cisapi_client::ApiError> {
//! // Reads CIS_API_CREDS.txt, stage "default"
//! let mut client = CisClient::builder().build()?;
//!
//! let brands = client.get_brands().await?;
//! let supply = client.days_supply("FORD", DEFAULT_REGION).await?;
//! println!("{brands}\n{supply}");
//! # Ok(())
//! # }
//! ```

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use cisapi_common::ProxyProfile;

pub mod catalog;
pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod error;

pub use catalog::{ENDPOINTS, EndpointSpec};
pub use client::{CisClient, CisClientBuilder, TOKEN_ENDPOINT, TOKEN_PARAM};
pub use endpoints::{DEFAULT_DAYS_BACK, DEFAULT_REGION, ListingSearch, ValuationQuery};
pub use error::ApiError;

/// Join a base URL and an endpoint name with exactly one `/` between them.
///
/// # Examples
///
/// ```
/// use cisapi_client::join_url;
///
/// assert_eq!(join_url("https://api.autodealerdata.com/", "/getRegions"),
///            "https://api.autodealerdata.com/getRegions");
/// ```
#[must_use]
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Attach the marketplace host and key headers of a proxy profile.
pub(crate) fn add_proxy_headers(
    request_builder: RequestBuilder,
    proxy: &ProxyProfile,
    api_key: &SecretString,
) -> RequestBuilder {
    request_builder
        .header(proxy.host_header.as_str(), proxy.host.as_str())
        .header(proxy.key_header.as_str(), api_key.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_url_slash_combinations() {
        let expected = "https://example.com/getBrands";
        assert_eq!(join_url("https://example.com", "getBrands"), expected);
        assert_eq!(join_url("https://example.com/", "getBrands"), expected);
        assert_eq!(join_url("https://example.com", "/getBrands"), expected);
        assert_eq!(join_url("https://example.com/", "/getBrands"), expected);
    }

    #[test]
    fn test_join_url_keeps_base_path() {
        assert_eq!(
            join_url("http://localhost:8080/v2/", "topModels"),
            "http://localhost:8080/v2/topModels"
        );
    }

    proptest! {
        #[test]
        fn test_join_url_single_separator(
            base in "https://[a-z]{1,12}\\.com",
            endpoint in "[a-zA-Z]{1,20}",
            trailing in any::<bool>(),
            leading in any::<bool>(),
        ) {
            let b = if trailing { format!("{base}/") } else { base.clone() };
            let e = if leading { format!("/{endpoint}") } else { endpoint.clone() };
            let joined = join_url(&b, &e);

            prop_assert_eq!(joined, format!("{base}/{endpoint}"));
        }
    }
}
