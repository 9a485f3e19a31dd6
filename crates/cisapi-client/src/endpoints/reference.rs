//! Static reference data: regions, brands and models.

use serde_json::Value;

use cisapi_common::Params;

use super::request;
use crate::{ApiError, CisClient};

impl CisClient {
    /// List the region names accepted by region-scoped endpoints.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn get_regions(&mut self) -> Result<Value, ApiError> {
        self.send(request("getRegions", Params::new())).await
    }

    /// List the brands with data.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn get_brands(&mut self) -> Result<Value, ApiError> {
        self.send(request("getBrands", Params::new())).await
    }

    /// List the current models of a brand.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn get_models(&mut self, brand_name: &str) -> Result<Value, ApiError> {
        self.send(request("getModels", Params::new().with("brandName", brand_name)))
            .await
    }

    /// List the discontinued models of a brand.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn get_inactive_models(&mut self, brand_name: &str) -> Result<Value, ApiError> {
        self.send(request(
            "getInactiveModels",
            Params::new().with("brandName", brand_name),
        ))
        .await
    }
}
