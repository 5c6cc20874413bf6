//! Conversions between CloudFront's multi-value shapes and the flat maps the signer
//! works with.

use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::event::{HeaderEntry, MultiValueHeaders};

/// Lower-cased header name to a single value, ordered by name.
pub type HeaderBag = BTreeMap<String, String>;

/// Query parameters in the order their names were first seen.
pub type QueryParameters = IndexMap<String, QueryValue>;

/// Value side of a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
    /// The name was present with nothing after `=`.
    Empty,
}

impl QueryValue {
    /// Values in order, `Empty` contributing a single empty value.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multiple(values) => values.iter().map(String::as_str).collect(),
            QueryValue::Empty => vec![""],
        }
    }

    fn push(&mut self, value: Option<&str>) {
        let mut values: Vec<String> = self.values().into_iter().map(str::to_string).collect();
        values.push(value.unwrap_or_default().to_string());
        *self = QueryValue::Multiple(values);
    }
}

/// Flattens CloudFront headers, keeping the first value of each name.
///
/// Later values of a repeated header are dropped. A name with no entries maps to an
/// empty string.
pub fn to_header_bag(headers: &MultiValueHeaders) -> HeaderBag {
    headers
        .iter()
        .map(|(name, entries)| {
            let value = entries
                .first()
                .map(|entry| entry.value.clone())
                .unwrap_or_default();
            (name.to_lowercase(), value)
        })
        .collect()
}

/// Expands a header bag back into CloudFront's shape, one entry per name.
pub fn to_multi_value_headers(bag: &HeaderBag) -> MultiValueHeaders {
    bag.iter()
        .map(|(name, value)| (name.clone(), vec![HeaderEntry::new(name.as_str(), value.as_str())]))
        .collect()
}

/// Parses a raw query string without URL-decoding it.
///
/// Segments lacking `=` or with an empty name are dropped. `name=` is kept as
/// [`QueryValue::Empty`] and repeated names accumulate into [`QueryValue::Multiple`].
pub fn parse_query_string(raw: &str) -> QueryParameters {
    let mut query = QueryParameters::new();
    for pair in raw.split('&') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let value = (!value.is_empty()).then_some(value);

        match query.get_mut(name) {
            Some(existing) => existing.push(value),
            None => {
                let parsed = match value {
                    Some(value) => QueryValue::Single(value.to_string()),
                    None => QueryValue::Empty,
                };
                query.insert(name.to_string(), parsed);
            }
        }
    }
    query
}

/// Serializes query parameters back to `name=value` segments.
///
/// Values are NOT percent-encoded: the output becomes the query of the URL handed to
/// the signer, which canonicalizes it itself. Encoding here as well would corrupt any
/// value containing `&`, `=` or `%`.
pub fn serialize_query_parameters(query: &QueryParameters) -> String {
    query
        .iter()
        .map(|(name, value)| match value {
            QueryValue::Single(value) => format!("{name}={value}"),
            QueryValue::Multiple(values) => values
                .iter()
                .map(|value| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("&"),
            QueryValue::Empty => format!("{name}="),
        })
        .collect::<Vec<_>>()
        .join("&")
}
