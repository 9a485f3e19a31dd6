//! Dealerships and their inventory.
//!
//! Listing endpoints are paged; ask for the next page until the result is
//! empty.

use chrono::NaiveDate;
use serde_json::Value;
use typed_builder::TypedBuilder;

use cisapi_common::{EndpointRequest, Params};

use super::request;
use crate::{ApiError, CisClient};

/// Filters for a listing search.
///
/// `region_name` and `page` are always sent. Every other field is a filter
/// that is only sent when set: empty strings, zero and `None` mean "no
/// filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct ListingSearch {
    /// Region to search.
    #[builder(setter(into))]
    pub region_name: String,
    /// Page number, starting at 1.
    pub page: u32,
    /// Brand name, as returned by `getBrands`.
    #[builder(default, setter(into))]
    pub brand_name: String,
    /// Model name, as returned by `getModels`.
    #[builder(default, setter(into))]
    pub model_name: String,
    /// Model year.
    #[builder(default)]
    pub year: i64,
    /// Lowest listing price in dollars.
    #[builder(default)]
    pub min_price: i64,
    /// Highest listing price in dollars.
    #[builder(default)]
    pub max_price: i64,
    /// Highest odometer reading in miles.
    #[builder(default)]
    pub max_mileage: i64,
    /// Only listings seen on or after this date.
    #[builder(default)]
    pub start_date: Option<NaiveDate>,
    /// Only listings seen on or before this date.
    #[builder(default)]
    pub end_date: Option<NaiveDate>,
}

impl ListingSearch {
    /// An unfiltered search of one page of a region.
    #[must_use]
    pub fn new(region_name: impl Into<String>, page: u32) -> Self {
        Self {
            region_name: region_name.into(),
            page,
            ..Self::default()
        }
    }

    /// The same search, one page further.
    #[must_use]
    pub fn next_page(mut self) -> Self {
        self.page = self.page.saturating_add(1);
        self
    }

    /// Build the `extendedListingSearch` request.
    #[must_use]
    pub fn into_request(self) -> EndpointRequest {
        let params = Params::new()
            .with("regionName", self.region_name)
            .with("page", self.page)
            .with_str_if_set("brandName", &self.brand_name)
            .with_str_if_set("modelName", &self.model_name)
            .with_int_if_set("year", self.year)
            .with_int_if_set("minPrice", self.min_price)
            .with_int_if_set("maxPrice", self.max_price)
            .with_int_if_set("maxMileage", self.max_mileage)
            .with_date_if_set("startDate", self.start_date)
            .with_date_if_set("endDate", self.end_date);
        request("extendedListingSearch", params)
    }
}

impl CisClient {
    /// Dealerships near a ZIP code.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn get_dealers(&mut self, zip_code: &str) -> Result<Value, ApiError> {
        self.send(request("getDealers", Params::new().with("zipCode", zip_code)))
            .await
    }

    /// One page of the dealerships in a region.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn get_dealers_by_region(
        &mut self,
        region_name: &str,
        page: u32,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("regionName", region_name)
            .with("page", page);
        self.send(request("getDealersByRegion", params)).await
    }

    /// One page of a dealership's current listings.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn dealer_listings(&mut self, dealer_id: &str, page: u32) -> Result<Value, ApiError> {
        let params = Params::new().with("dealerID", dealer_id).with("page", page);
        self.send(request("dealerListings", params)).await
    }

    /// Search listings across a region.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn extended_listing_search(
        &mut self,
        search: ListingSearch,
    ) -> Result<Value, ApiError> {
        self.send(search.into_request()).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn unfiltered_search_sends_region_and_page() {
        let request = ListingSearch::new("REGION_STATE_CA", 3).into_request();
        assert_eq!(request.name, "extendedListingSearch");
        assert_eq!(request.params.to_query(), vec![
            ("regionName".to_string(), "REGION_STATE_CA".to_string()),
            ("page".to_string(), "3".to_string()),
        ]);
    }

    #[test]
    fn date_window_is_sent() {
        let request = ListingSearch::builder()
            .region_name("REGION_STATE_TX")
            .page(1)
            .start_date(NaiveDate::from_ymd_opt(2022, 1, 1))
            .end_date(NaiveDate::from_ymd_opt(2022, 3, 31))
            .build()
            .into_request();

        assert_eq!(
            request.params.get("endDate").map(ToString::to_string),
            Some("2022-03-31".to_string())
        );
        assert_eq!(request.params.len(), 4);
    }

    #[test]
    fn next_page_keeps_filters() {
        let search = ListingSearch::builder()
            .region_name("REGION_STATE_CA")
            .page(1)
            .year(2019)
            .build()
            .next_page();

        assert_eq!(search.page, 2);
        assert_eq!(search.year, 2019);
    }
}
