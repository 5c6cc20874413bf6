//! Origin request transformation.
//!
//! A request routed to a function URL origin is rewritten so that the `host` header
//! names the origin, the viewer's host survives as `x-forwarded-host`, and the
//! headers carry a version 4 signature for the `lambda` service. Every other request
//! passes through untouched.

use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::builder::OriginRequestSignerBuilder;
use crate::codec::{parse_query_string, to_header_bag, to_multi_value_headers};
use crate::constants::{defaults, headers};
use crate::credentials::CredentialSource;
use crate::error::Result;
use crate::event::EdgeRequest;
use crate::origin::{extract_region, is_signable_origin};
use crate::signing::{sign_request, CanonicalRequest, SigningOptions, SigningParams};

/// Supplies the signing time.
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What happened to a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The origin does not need signing; the request is returned as received.
    PassThrough(EdgeRequest),
    /// The request now carries a signature for its function URL origin.
    Signed(EdgeRequest),
}

impl Outcome {
    /// The request to hand back to CloudFront.
    pub fn into_request(self) -> EdgeRequest {
        match self {
            Outcome::PassThrough(request) | Outcome::Signed(request) => request,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Outcome::Signed(_))
    }

    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::PassThrough(_) => "pass_through",
            Outcome::Signed(_) => "signed",
        }
    }
}

/// Signs origin requests bound for Lambda function URLs.
///
/// Holds no per-request state; credentials are resolved again for every request.
pub struct OriginRequestSigner {
    credentials: Arc<dyn CredentialSource>,
    service: String,
    clock: Clock,
    options: SigningOptions,
}

impl Debug for OriginRequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginRequestSigner")
            .field("credentials", &format_args!("<credential source>"))
            .field("service", &self.service)
            .field("clock", &format_args!("<function>"))
            .field("options", &self.options)
            .finish()
    }
}

impl OriginRequestSigner {
    /// Creates a builder for configuring the signer
    pub fn builder() -> OriginRequestSignerBuilder {
        OriginRequestSignerBuilder::new()
    }

    pub(crate) fn new(
        credentials: Arc<dyn CredentialSource>,
        service: impl Into<String>,
        clock: Clock,
        options: SigningOptions,
    ) -> Self {
        Self {
            credentials,
            service: service.into(),
            clock,
            options,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn options(&self) -> &SigningOptions {
        &self.options
    }

    /// Signs `request` if its origin is a function URL, otherwise hands it back as is.
    ///
    /// Only the headers of a signed request change. `x-forwarded-for` is removed
    /// before signing and is not forwarded to the origin.
    ///
    /// # Errors
    ///
    /// Fails without producing a request when the region cannot be read from the
    /// origin domain, credentials are incomplete, or the body cannot be decoded. A URI
    /// `aws-sigv4` cannot parse fails with [`crate::Error::Signing`].
    #[instrument(skip_all, fields(method = %request.method, uri = %request.uri))]
    pub fn process(&self, request: EdgeRequest) -> Result<Outcome> {
        let Some(domain) = request.origin_domain().map(str::to_string) else {
            debug!("request has no custom origin, forwarding unsigned");
            return Ok(Outcome::PassThrough(request));
        };
        if !is_signable_origin(&domain) {
            debug!(origin = %domain, "origin is not a function URL, forwarding unsigned");
            return Ok(Outcome::PassThrough(request));
        }

        let region = extract_region(&domain)?;
        let credentials = self.credentials.resolve()?;

        let mut request = request;
        match request.header(headers::HOST).map(str::to_string) {
            Some(original_host) => request.set_header(headers::X_FORWARDED_HOST, original_host),
            None => debug!("request has no host header, x-forwarded-host not set"),
        }
        request.set_header(headers::HOST, domain.as_str());

        let mut bag = to_header_bag(&request.headers);
        bag.remove(headers::X_FORWARDED_FOR);

        let body = match &request.body {
            Some(body) => body.decode()?,
            None => None,
        };

        let canonical = CanonicalRequest {
            method: request.method.clone(),
            hostname: bag.get(headers::HOST).cloned().unwrap_or(domain),
            path: request.uri.clone(),
            query: parse_query_string(&request.querystring),
            headers: bag,
            body,
            protocol: defaults::PROTOCOL.to_string(),
        };
        let params = SigningParams {
            credentials: &credentials,
            region: &region,
            service: &self.service,
            time: (self.clock)(),
            options: &self.options,
        };
        let signed = sign_request(&canonical, &params)?;

        request.headers = to_multi_value_headers(&signed.headers);
        info!(
            region = %region,
            signed_headers = %signed.signed_headers,
            "signed origin request"
        );
        Ok(Outcome::Signed(request))
    }
}
