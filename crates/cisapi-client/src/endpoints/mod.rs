//! Typed bindings for the documented endpoints.
//!
//! Each binding turns its arguments into an [`EndpointRequest`] and sends it
//! through [`CisClient::send`](crate::CisClient::send) with bearer
//! authentication. Responses are returned as raw JSON.
//!
//! Region-scoped endpoints take a region name such as [`DEFAULT_REGION`];
//! the full list comes from [`CisClient::get_regions`](crate::CisClient::get_regions).

mod dealers;
mod market;
mod reference;
mod vehicles;

pub use dealers::ListingSearch;
pub use vehicles::ValuationQuery;

use cisapi_common::{EndpointRequest, Params};

/// Region used when the caller has no preference.
pub const DEFAULT_REGION: &str = "REGION_STATE_CA";

/// Days of history used by `similarSalePrice` unless told otherwise.
pub const DEFAULT_DAYS_BACK: u32 = 45;

fn request(name: &str, params: Params) -> EndpointRequest {
    EndpointRequest::new(name, params)
}
