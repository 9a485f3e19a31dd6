use std::fmt;

use chrono::NaiveDate;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text, sent verbatim.
    Str(String),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean, sent as `True`/`False`.
    Bool(bool),
    /// Calendar date, sent as `YYYY-MM-DD`.
    Date(NaiveDate),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            // The API was built against Python clients and expects capitalized booleans
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Query parameters for one request, in insertion order.
///
/// Setting a key that is already present replaces its value in place.
/// The `*_if_set` helpers implement the sparse rule used by endpoints with
/// optional filters: a value equal to its "unset" sentinel (empty string,
/// zero, absent date) is not added at all.
///
/// # Examples
///
/// ```
/// use cisapi_common::Params;
///
/// let params = Params::new()
///     .with("vin", "1HGCM82633A004352")
///     .with_str_if_set("zipCode", "")
///     .with_int_if_set("mileage", 42_000);
///
/// assert_eq!(params.to_query(), vec![
///     ("vin".to_string(), "1HGCM82633A004352".to_string()),
///     ("mileage".to_string(), "42000".to_string()),
/// ]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder form of [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds `value` unless it is empty.
    #[must_use]
    pub fn with_str_if_set(self, key: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.with(key, value)
        }
    }

    /// Adds `value` unless it is zero.
    #[must_use]
    pub fn with_int_if_set(self, key: impl Into<String>, value: i64) -> Self {
        if value == 0 {
            self
        } else {
            self.with(key, value)
        }
    }

    /// Adds `value` if present.
    #[must_use]
    pub fn with_date_if_set(self, key: impl Into<String>, value: Option<NaiveDate>) -> Self {
        match value {
            Some(date) => self.with(key, date),
            None => self,
        }
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the parameter names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the parameters as query-string pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// A call to one endpoint: its name and its query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    /// Endpoint name, e.g. `getRegions`.
    pub name: String,
    /// Query parameters.
    pub params: Params,
}

impl EndpointRequest {
    /// Creates a request for `name` with `params`.
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn renders_values() {
        let date = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        let params = Params::new()
            .with("s", "text")
            .with("i", 45)
            .with("f", 0.5)
            .with("yes", true)
            .with("no", false)
            .with("d", date);

        assert_eq!(
            params.to_query(),
            vec![
                ("s".to_string(), "text".to_string()),
                ("i".to_string(), "45".to_string()),
                ("f".to_string(), "0.5".to_string()),
                ("yes".to_string(), "True".to_string()),
                ("no".to_string(), "False".to_string()),
                ("d".to_string(), "2021-09-01".to_string()),
            ]
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(params.get("a"), Some(&ParamValue::Int(3)));
    }

    #[test]
    fn sparse_helpers_skip_sentinels() {
        let params = Params::new()
            .with_str_if_set("brandName", "")
            .with_int_if_set("year", 0)
            .with_date_if_set("startDate", None);
        assert!(params.is_empty());

        let params = Params::new()
            .with_str_if_set("brandName", "FORD")
            .with_int_if_set("year", 2020)
            .with_date_if_set("startDate", NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(params.len(), 3);
        assert!(params.contains_key("startDate"));
    }

    #[test]
    fn collects_from_pairs() {
        let params: Params = [("vin", "X"), ("regionName", "REGION_STATE_CA")]
            .into_iter()
            .collect();
        assert_eq!(params.get("vin"), Some(&ParamValue::Str("X".to_string())));
        assert_eq!(params.len(), 2);
    }
}
