//! Market statistics: supply, pricing and sales.
//!
//! Monthly endpoints take any date inside the month; the API only looks at
//! the year and month.

use chrono::NaiveDate;
use serde_json::Value;

use cisapi_common::Params;

use super::request;
use crate::{ApiError, CisClient};

fn brand_in_region(brand_name: &str, region_name: &str) -> Params {
    Params::new()
        .with("brandName", brand_name)
        .with("regionName", region_name)
}

impl CisClient {
    /// Average days a brand's vehicles stay on the lot before selling.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn days_to_sell(
        &mut self,
        brand_name: &str,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        self.send(request("daysToSell", brand_in_region(brand_name, region_name)))
            .await
    }

    /// Days of inventory on hand at the current sales rate.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn days_supply(
        &mut self,
        brand_name: &str,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        self.send(request("daysSupply", brand_in_region(brand_name, region_name)))
            .await
    }

    /// Listing price statistics for a brand.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn list_price(
        &mut self,
        brand_name: &str,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        self.send(request("listPrice", brand_in_region(brand_name, region_name)))
            .await
    }

    /// Sale price statistics for a brand.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn sale_price(
        &mut self,
        brand_name: &str,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        self.send(request("salePrice", brand_in_region(brand_name, region_name)))
            .await
    }

    /// Sale price distribution for one model.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn sale_price_histogram(
        &mut self,
        brand_name: &str,
        model_name: &str,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("brandName", brand_name)
            .with("modelName", model_name)
            .with("regionName", region_name);
        self.send(request("salePriceHistogram", params)).await
    }

    /// Best selling models in a region.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn top_models(&mut self, region_name: &str) -> Result<Value, ApiError> {
        self.send(request(
            "topModels",
            Params::new().with("regionName", region_name),
        ))
        .await
    }

    /// Sales of a brand in the month containing `month`.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn region_sales(
        &mut self,
        brand_name: &str,
        month: NaiveDate,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("brandName", brand_name)
            .with("month", month)
            .with("regionName", region_name);
        self.send(request("regionSales", params)).await
    }

    /// Sales of a brand on a single day.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn region_daily_sales(
        &mut self,
        brand_name: &str,
        day: NaiveDate,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("brandName", brand_name)
            .with("day", day)
            .with("regionName", region_name);
        self.send(request("regionDailySales", params)).await
    }

    /// Sales of one model in the month containing `month`.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn model_sales(
        &mut self,
        brand_name: &str,
        model_name: &str,
        month: NaiveDate,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("brandName", brand_name)
            .with("modelName", model_name)
            .with("month", month)
            .with("regionName", region_name);
        self.send(request("modelSales", params)).await
    }

    /// Share of sales per brand in the month containing `month`.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn market_share(
        &mut self,
        month: NaiveDate,
        region_name: &str,
    ) -> Result<Value, ApiError> {
        let params = Params::new()
            .with("month", month)
            .with("regionName", region_name);
        self.send(request("marketShare", params)).await
    }
}
