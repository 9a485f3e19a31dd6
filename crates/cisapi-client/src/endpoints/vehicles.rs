//! Per-vehicle data keyed by VIN.

use chrono::NaiveDate;
use serde_json::Value;
use typed_builder::TypedBuilder;

use cisapi_common::{EndpointRequest, Params};

use super::request;
use crate::{ApiError, CisClient};

/// Parameters for a vehicle valuation.
///
/// Only `vin` is required. Optional fields left at their default (empty
/// string, zero, `None`) are not sent, and the API picks its own default.
///
/// # Examples
///
/// ```
/// use cisapi_client::ValuationQuery;
///
/// let query = ValuationQuery::builder()
///     .vin("1FTFW1ET5DFC10312")
///     .mileage(64_000)
///     .zip_code("90210")
///     .build();
///
/// let request = query.into_request();
/// assert_eq!(request.name, "valuation");
/// assert_eq!(request.params.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct ValuationQuery {
    /// Vehicle identification number.
    #[builder(setter(into))]
    pub vin: String,
    /// Odometer reading in miles.
    #[builder(default)]
    pub mileage: i64,
    /// ZIP code of the vehicle's location.
    #[builder(default, setter(into))]
    pub zip_code: String,
    /// Region to value the vehicle in.
    #[builder(default, setter(into))]
    pub region_name: String,
    /// Condition grade, as accepted by the API.
    #[builder(default, setter(into))]
    pub condition: String,
    /// Trim level.
    #[builder(default, setter(into))]
    pub trim: String,
    /// Value the vehicle as of this date instead of today.
    #[builder(default)]
    pub as_of: Option<NaiveDate>,
}

impl ValuationQuery {
    /// A query with only the VIN set.
    #[must_use]
    pub fn new(vin: impl Into<String>) -> Self {
        Self {
            vin: vin.into(),
            ..Self::default()
        }
    }

    /// Build the `valuation` request.
    #[must_use]
    pub fn into_request(self) -> EndpointRequest {
        let params = Params::new()
            .with("vin", self.vin)
            .with_int_if_set("mileage", self.mileage)
            .with_str_if_set("zipCode", &self.zip_code)
            .with_str_if_set("regionName", &self.region_name)
            .with_str_if_set("condition", &self.condition)
            .with_str_if_set("trim", &self.trim)
            .with_date_if_set("asOf", self.as_of);
        request("valuation", params)
    }
}

impl CisClient {
    /// Recent sale prices of vehicles similar to this one.
    ///
    /// `days_back` bounds how far back sales are considered
    /// ([`DEFAULT_DAYS_BACK`](super::DEFAULT_DAYS_BACK) is the usual
    /// choice); `same_year` restricts matches to the same model year.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn similar_sale_price(
        &mut self,
        vin: &str,
        region_name: &str,
        days_back: u32,
        same_year: bool,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("vin", vin)
            .with("daysBack", days_back)
            .with("regionName", region_name)
            .with("sameYear", same_year);
        self.send(request("similarSalePrice", params)).await
    }

    /// Estimate a vehicle's value.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn valuation(&mut self, query: ValuationQuery) -> Result<Value, ApiError> {
        self.send(query.into_request()).await
    }

    /// Listing and sale history of a vehicle.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn vehicle_history(&mut self, vin: &str) -> Result<Value, ApiError> {
        self.send(request("vehicleHistory", Params::new().with("vin", vin)))
            .await
    }

    /// Decode a VIN into its build attributes.
    ///
    /// With `pass_empty` the API also returns attributes it has no value for.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn vin_decode(&mut self, vin: &str, pass_empty: bool) -> Result<Value, ApiError> {
        let params = Params::new().with("vin", vin).with("passEmpty", pass_empty);
        self.send(request("vinDecode", params)).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn vin_only_valuation() {
        let request = ValuationQuery::new("VIN").into_request();
        assert_eq!(request.params.keys().collect::<Vec<_>>(), vec!["vin"]);
    }

    #[test]
    fn full_valuation_in_declared_order() {
        let request = ValuationQuery::builder()
            .vin("VIN")
            .mileage(10)
            .zip_code("02139")
            .region_name("REGION_STATE_MA")
            .condition("good")
            .trim("XLT")
            .as_of(NaiveDate::from_ymd_opt(2023, 5, 2))
            .build()
            .into_request();

        assert_eq!(
            request.params.keys().collect::<Vec<_>>(),
            vec!["vin", "mileage", "zipCode", "regionName", "condition", "trim", "asOf"]
        );
        // Leading zeros survive
        assert_eq!(
            request.params.get("zipCode").map(ToString::to_string),
            Some("02139".to_string())
        );
    }
}
