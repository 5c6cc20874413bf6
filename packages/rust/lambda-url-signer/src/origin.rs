//! Recognition of Lambda function URL origins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref LAMBDA_URL_DOMAIN: Regex =
        Regex::new(r"(?i)^[a-z0-9]+\.lambda-url\.[a-z0-9-]+\.on\.aws$")
            .expect("Invalid function URL pattern");
}

/// Returns true when `domain` is a function URL host (`<id>.lambda-url.<region>.on.aws`).
///
/// Anything else is forwarded unsigned; that is not an error.
pub fn is_signable_origin(domain: &str) -> bool {
    LAMBDA_URL_DOMAIN.is_match(domain)
}

/// Region token of a function URL domain, i.e. its third label.
pub fn extract_region(domain: &str) -> Result<String> {
    domain
        .split('.')
        .nth(2)
        .filter(|region| !region.is_empty())
        .map(str::to_lowercase)
        .ok_or_else(|| Error::RegionExtraction {
            domain: domain.to_string(),
        })
}
