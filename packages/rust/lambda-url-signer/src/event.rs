//! CloudFront origin-request event types.
//!
//! Only the fields the signer reads are modelled; everything else is kept in `extra`
//! maps so a request handed back to CloudFront has exactly the shape it arrived with.

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Header name (lower-cased) to the ordered values CloudFront received for it.
pub type MultiValueHeaders = BTreeMap<String, Vec<HeaderEntry>>;

/// The Lambda@Edge event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontEvent {
    #[serde(rename = "Records")]
    pub records: Vec<CloudFrontRecord>,
}

impl CloudFrontEvent {
    /// Takes the single record CloudFront delivers per invocation.
    pub fn into_first_record(self) -> Result<CloudFrontRecord> {
        self.records
            .into_iter()
            .next()
            .ok_or(Error::EventWithoutRecords)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<CloudFrontConfig>,
    pub request: EdgeRequest,
}

/// Distribution metadata attached to each record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFrontConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// The request CloudFront is about to send to the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRequest {
    pub method: String,
    /// Path only, the query lives in `querystring`.
    pub uri: String,
    /// Raw query string, without the leading `?`.
    #[serde(default)]
    pub querystring: String,
    #[serde(default)]
    pub headers: MultiValueHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    /// Fields such as `clientIp` that pass through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeRequest {
    /// Domain of the custom origin this request is routed to, if any.
    pub fn origin_domain(&self) -> Option<&str> {
        self.origin
            .as_ref()
            .and_then(|origin| origin.custom.as_ref())
            .map(|custom| custom.domain_name.as_str())
            .filter(|domain| !domain.is_empty())
    }

    /// First value of a header, looked up by lower-cased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }

    /// Replaces every value of a header with a single entry.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(
            name.to_string(),
            vec![HeaderEntry::new(name, value.into())],
        );
    }
}

/// A single header value as CloudFront represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Original spelling of the header name; CloudFront may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomOrigin>,
    /// `s3` origins and anything else CloudFront adds.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrigin {
    pub domain_name: String,
    /// Port, protocol, timeouts, custom headers.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Base64,
    Text,
}

/// Request body exposed when the cache behavior includes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_truncated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Defaults to base64 when CloudFront leaves it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<BodyEncoding>,
    #[serde(default)]
    pub data: String,
}

impl RequestBody {
    /// Decodes the payload into the bytes the origin will receive.
    ///
    /// Empty data means there is nothing to sign and yields `None`. A truncated body
    /// would produce a payload hash the origin can never reproduce, so it is rejected.
    pub fn decode(&self) -> Result<Option<Vec<u8>>> {
        if self.data.is_empty() {
            return Ok(None);
        }
        if self.input_truncated.unwrap_or(false) {
            return Err(Error::TruncatedBody);
        }

        let bytes = match self.encoding.unwrap_or(BodyEncoding::Base64) {
            BodyEncoding::Base64 => general_purpose::STANDARD.decode(&self.data)?,
            BodyEncoding::Text => self.data.as_bytes().to_vec(),
        };
        Ok(Some(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Value {
        json!({
            "Records": [{
                "cf": {
                    "config": {
                        "distributionDomainName": "d111111abcdef8.cloudfront.net",
                        "distributionId": "EDFDVBD6EXAMPLE",
                        "eventType": "origin-request",
                        "requestId": "4TyzHTaYWb1GX1qTfsHhEqV6HUDd_BzoBZnwfnvQc_1oF26ClkoUSEQ=="
                    },
                    "request": {
                        "clientIp": "203.0.113.178",
                        "headers": {
                            "host": [{"key": "Host", "value": "www.example.com"}],
                            "x-forwarded-for": [{"key": "X-Forwarded-For", "value": "203.0.113.178"}]
                        },
                        "method": "POST",
                        "origin": {
                            "custom": {
                                "customHeaders": {},
                                "domainName": "abc123.lambda-url.us-east-1.on.aws",
                                "keepaliveTimeout": 5,
                                "path": "",
                                "port": 443,
                                "protocol": "https",
                                "readTimeout": 30,
                                "sslProtocols": ["TLSv1.2"]
                            }
                        },
                        "body": {
                            "action": "read-only",
                            "data": "eyJoZWxsbyI6IndvcmxkIn0=",
                            "encoding": "base64",
                            "inputTruncated": false
                        },
                        "querystring": "a=1",
                        "uri": "/api/items"
                    }
                }
            }]
        })
    }

    #[test]
    fn test_deserialize_origin_request_event() {
        let event: CloudFrontEvent = serde_json::from_value(sample_event()).unwrap();
        let record = event.into_first_record().unwrap();
        let config = record.cf.config.unwrap();
        assert_eq!(config.event_type.as_deref(), Some("origin-request"));

        let request = record.cf.request;
        assert_eq!(request.method, "POST");
        assert_eq!(request.uri, "/api/items");
        assert_eq!(request.querystring, "a=1");
        assert_eq!(request.header("host"), Some("www.example.com"));
        assert_eq!(
            request.origin_domain(),
            Some("abc123.lambda-url.us-east-1.on.aws")
        );
        assert_eq!(request.extra.get("clientIp"), Some(&json!("203.0.113.178")));
    }

    #[test]
    fn test_serialization_preserves_unknown_fields() {
        let original = sample_event();
        let event: CloudFrontEvent = serde_json::from_value(original.clone()).unwrap();
        let request = event.into_first_record().unwrap().cf.request;

        let round_tripped = serde_json::to_value(&request).unwrap();
        assert_eq!(round_tripped, original["Records"][0]["cf"]["request"]);
    }

    #[test]
    fn test_event_without_records() {
        let event: CloudFrontEvent = serde_json::from_value(json!({"Records": []})).unwrap();
        assert!(matches!(
            event.into_first_record(),
            Err(Error::EventWithoutRecords)
        ));
    }

    #[test]
    fn test_origin_domain_absent_for_s3_origin() {
        let request: EdgeRequest = serde_json::from_value(json!({
            "method": "GET",
            "uri": "/",
            "origin": {"s3": {"domainName": "bucket.s3.amazonaws.com"}}
        }))
        .unwrap();
        assert_eq!(request.origin_domain(), None);
        assert!(request.origin.unwrap().extra.contains_key("s3"));
    }

    #[test]
    fn test_body_decoding() {
        let body = RequestBody {
            input_truncated: Some(false),
            action: None,
            encoding: Some(BodyEncoding::Base64),
            data: "eyJoZWxsbyI6IndvcmxkIn0=".to_string(),
        };
        assert_eq!(
            body.decode().unwrap().as_deref(),
            Some(br#"{"hello":"world"}"#.as_slice())
        );

        let text = RequestBody {
            encoding: Some(BodyEncoding::Text),
            data: "plain".to_string(),
            ..body.clone()
        };
        assert_eq!(text.decode().unwrap().as_deref(), Some(b"plain".as_slice()));

        let empty = RequestBody {
            data: String::new(),
            ..body.clone()
        };
        assert_eq!(empty.decode().unwrap(), None);
    }

    #[test]
    fn test_body_decoding_failures() {
        let invalid = RequestBody {
            input_truncated: None,
            action: None,
            encoding: None,
            data: "not base64!".to_string(),
        };
        assert!(matches!(
            invalid.decode(),
            Err(Error::InvalidBodyEncoding(_))
        ));

        let truncated = RequestBody {
            input_truncated: Some(true),
            data: "aGVsbG8=".to_string(),
            ..invalid
        };
        assert!(matches!(truncated.decode(), Err(Error::TruncatedBody)));
    }
}
