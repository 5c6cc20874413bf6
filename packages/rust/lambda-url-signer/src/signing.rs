//! Request signing functionality for AWS SigV4

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SessionTokenMode, SignableBody, SignableRequest,
    SigningSettings, UriPathNormalizationMode,
};
use aws_smithy_runtime_api::client::identity::Identity;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::time::SystemTime;
use tracing::debug;

use crate::codec::{serialize_query_parameters, HeaderBag, QueryParameters};
use crate::constants::headers::{self, UNSIGNABLE, UNSIGNABLE_PREFIXES};
use crate::credentials::ensure_complete;
use crate::error::{Error, Result};

/// The request as the signer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    pub method: String,
    pub hostname: String,
    /// Path as received on the wire.
    pub path: String,
    pub query: QueryParameters,
    pub headers: HeaderBag,
    pub body: Option<Vec<u8>>,
    pub protocol: String,
}

impl CanonicalRequest {
    /// `protocol://hostname/path?query`, the query serialized as parsed.
    pub fn url(&self) -> String {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        let query = serialize_query_parameters(&self.query);
        if query.is_empty() {
            format!("{}://{}{}", self.protocol, self.hostname, path)
        } else {
            format!("{}://{}{}?{}", self.protocol, self.hostname, path, query)
        }
    }
}

/// Signing modes applied to every request, expressed with `aws-sigv4`'s own types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOptions {
    pub percent_encoding_mode: PercentEncodingMode,
    /// `XAmzSha256` attaches and signs `x-amz-content-sha256`.
    pub payload_checksum_kind: PayloadChecksumKind,
    pub session_token_mode: SessionTokenMode,
    pub uri_path_normalization_mode: UriPathNormalizationMode,
}

impl Default for SigningOptions {
    fn default() -> Self {
        Self {
            percent_encoding_mode: PercentEncodingMode::Double,
            payload_checksum_kind: PayloadChecksumKind::XAmzSha256,
            session_token_mode: SessionTokenMode::Include,
            uri_path_normalization_mode: UriPathNormalizationMode::Enabled,
        }
    }
}

impl SigningOptions {
    fn to_signing_settings(&self, excluded_headers: Vec<Cow<'static, str>>) -> SigningSettings {
        let mut settings = SigningSettings::default();
        settings.percent_encoding_mode = self.percent_encoding_mode;
        settings.payload_checksum_kind = self.payload_checksum_kind;
        settings.session_token_mode = self.session_token_mode;
        settings.uri_path_normalization_mode = self.uri_path_normalization_mode;
        settings.excluded_headers = Some(excluded_headers);
        settings
    }
}

/// Inputs of one signing operation besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    pub credentials: &'a Credentials,
    pub region: &'a str,
    pub service: &'a str,
    pub time: DateTime<Utc>,
    pub options: &'a SigningOptions,
}

/// Headers to send plus the signature they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    /// The request headers with the signing headers added.
    pub headers: HeaderBag,
    pub signature: String,
    /// `;`-joined names covered by the signature.
    pub signed_headers: String,
}

/// Signs `request` with AWS SigV4 and returns its headers with the signing headers added.
///
/// Credentials are validated before anything is hashed. Signing headers already present
/// on the request are replaced.
pub fn sign_request(request: &CanonicalRequest, params: &SigningParams<'_>) -> Result<SigningOutput> {
    ensure_complete(params.credentials)?;

    let mut bag = request.headers.clone();
    for stale in [
        headers::AUTHORIZATION,
        headers::X_AMZ_DATE,
        headers::X_AMZ_SECURITY_TOKEN,
        headers::X_AMZ_CONTENT_SHA256,
    ] {
        bag.remove(stale);
    }
    bag
        .entry(headers::HOST.to_string())
        .or_insert_with(|| request.hostname.clone());

    let identity: Identity = <Credentials as Into<Identity>>::into(params.credentials.clone());

    let signing_params = aws_sigv4::http_request::SigningParams::V4(
        aws_sigv4::sign::v4::SigningParams::builder()
            .identity(&identity)
            .region(params.region)
            .name(params.service)
            .time(SystemTime::from(params.time))
            .settings(params.options.to_signing_settings(excluded_headers(&bag)))
            .build()
            .map_err(|e| Error::Signing(e.into()))?,
    );

    let url = request.url();
    let signable_request = SignableRequest::new(
        &request.method,
        url.as_str(),
        bag.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        SignableBody::Bytes(request.body.as_deref().unwrap_or_default()),
    )
    .map_err(|e| Error::Signing(e.into()))?;

    let (signing_instructions, signature) =
        aws_sigv4::http_request::sign(signable_request, &signing_params)
            .map_err(|e| Error::Signing(e.into()))?
            .into_parts();

    let (signed_headers, _) = signing_instructions.into_parts();
    for header in signed_headers.into_iter() {
        bag.insert(header.name().to_string(), header.value().to_string());
    }

    let signed_header_names = bag
        .get(headers::AUTHORIZATION)
        .and_then(|authorization| signed_header_names(authorization))
        .unwrap_or_default();
    debug!(url = %url, signed_headers = %signed_header_names, "signed origin request");

    Ok(SigningOutput {
        headers: bag,
        signature,
        signed_headers: signed_header_names,
    })
}

/// Whether a lower-cased header name may take part in a signature.
pub fn is_signable_header(name: &str) -> bool {
    !UNSIGNABLE.contains(&name)
        && !UNSIGNABLE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

/// Names in `headers` the signer must leave out of the signature.
fn excluded_headers(headers: &HeaderBag) -> Vec<Cow<'static, str>> {
    UNSIGNABLE
        .iter()
        .map(|name| Cow::Borrowed(*name))
        .chain(
            headers
                .keys()
                .filter(|name| !is_signable_header(name) && !UNSIGNABLE.contains(&name.as_str()))
                .map(|name| Cow::Owned(name.clone())),
        )
        .collect()
}

fn signed_header_names(authorization: &str) -> Option<String> {
    authorization
        .split(", ")
        .find_map(|part| part.strip_prefix("SignedHeaders="))
        .map(str::to_string)
}
