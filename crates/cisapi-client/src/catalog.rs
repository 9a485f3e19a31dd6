//! Static catalog of the documented endpoints and their parameters.
//!
//! The catalog mirrors the typed bindings on [`CisClient`](crate::CisClient)
//! and lets tools such as the CLI list endpoints and check arguments before
//! calling [`CisClient::call`](crate::CisClient::call).

use std::fmt;

use cisapi_common::Params;

/// Parameter names of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Endpoint name as it appears in the URL.
    pub name: &'static str,
    /// Parameters that must always be sent, in the order bindings send them.
    pub required: &'static [&'static str],
    /// Filters that may be left out.
    pub optional: &'static [&'static str],
}

/// Problems found by [`EndpointSpec::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamReport {
    /// Required parameters that were not given.
    pub missing: Vec<&'static str>,
    /// Given parameters the endpoint does not document.
    pub unknown: Vec<String>,
}

impl ParamReport {
    /// Returns `true` if nothing was missing or unknown.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

impl EndpointSpec {
    /// Returns `true` if `param` is a documented parameter.
    #[must_use]
    pub fn accepts(&self, param: &str) -> bool {
        self.required.contains(&param) || self.optional.contains(&param)
    }

    /// Compare `params` against the documented parameter set.
    ///
    /// The bearer token parameter is never reported.
    #[must_use]
    pub fn check(&self, params: &Params) -> ParamReport {
        let missing = self
            .required
            .iter()
            .copied()
            .filter(|name| !params.contains_key(name))
            .collect();

        let unknown = params
            .keys()
            .filter(|key| *key != crate::TOKEN_PARAM && !self.accepts(key))
            .map(ToString::to_string)
            .collect();

        ParamReport { missing, unknown }
    }
}

impl fmt::Display for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut first = true;
        for name in self.required {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        for name in self.optional {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "[{name}]")?;
            first = false;
        }
        f.write_str(")")
    }
}

const fn spec(
    name: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
) -> EndpointSpec {
    EndpointSpec {
        name,
        required,
        optional,
    }
}

const BRAND_REGION: &[&str] = &["brandName", "regionName"];

/// Every endpoint with a typed binding.
pub const ENDPOINTS: &[EndpointSpec] = &[
    spec("getRegions", &[], &[]),
    spec("getBrands", &[], &[]),
    spec("getModels", &["brandName"], &[]),
    spec("getInactiveModels", &["brandName"], &[]),
    spec("daysToSell", BRAND_REGION, &[]),
    spec("daysSupply", BRAND_REGION, &[]),
    spec("listPrice", BRAND_REGION, &[]),
    spec("salePrice", BRAND_REGION, &[]),
    spec(
        "salePriceHistogram",
        &["brandName", "modelName", "regionName"],
        &[],
    ),
    spec(
        "similarSalePrice",
        &["vin", "daysBack", "regionName", "sameYear"],
        &[],
    ),
    spec(
        "valuation",
        &["vin"],
        &["mileage", "zipCode", "regionName", "condition", "trim", "asOf"],
    ),
    spec("topModels", &["regionName"], &[]),
    spec("regionSales", &["brandName", "month", "regionName"], &[]),
    spec("regionDailySales", &["brandName", "day", "regionName"], &[]),
    spec(
        "modelSales",
        &["brandName", "modelName", "month", "regionName"],
        &[],
    ),
    spec("marketShare", &["month", "regionName"], &[]),
    spec("getDealers", &["zipCode"], &[]),
    spec("getDealersByRegion", &["regionName", "page"], &[]),
    spec("dealerListings", &["dealerID", "page"], &[]),
    spec(
        "extendedListingSearch",
        &["regionName", "page"],
        &[
            "brandName",
            "modelName",
            "year",
            "minPrice",
            "maxPrice",
            "maxMileage",
            "startDate",
            "endDate",
        ],
    ),
    spec("vehicleHistory", &["vin"], &[]),
    spec("vinDecode", &["vin", "passEmpty"], &[]),
];

/// Look up an endpoint by name. A leading `/` is ignored.
#[must_use]
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
    let name = name.trim_start_matches('/');
    ENDPOINTS.iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = ENDPOINTS.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), ENDPOINTS.len());
    }

    #[test]
    fn token_endpoint_is_not_listed() {
        assert!(find(crate::TOKEN_ENDPOINT).is_none());
    }

    #[test]
    fn find_ignores_leading_slash() {
        assert_eq!(find("/vinDecode").unwrap().name, "vinDecode");
        assert!(find("noSuchEndpoint").is_none());
    }

    #[test]
    fn check_reports_missing_and_unknown() {
        let spec = find("valuation").unwrap();

        let params = Params::new().with("mileage", 10).with("colour", "red");
        let report = spec.check(&params);
        assert_eq!(report.missing, vec!["vin"]);
        assert_eq!(report.unknown, vec!["colour".to_string()]);

        let params = Params::new().with("vin", "X").with("jwt", "T");
        assert!(spec.check(&params).is_clean());
    }

    #[test]
    fn display_marks_optional_params() {
        assert_eq!(find("getRegions").unwrap().to_string(), "getRegions()");
        assert_eq!(
            find("valuation").unwrap().to_string(),
            "valuation(vin, [mileage], [zipCode], [regionName], [condition], [trim], [asOf])"
        );
    }
}
