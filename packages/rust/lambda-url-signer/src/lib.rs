//! AWS SigV4 signing of CloudFront origin requests bound for Lambda function URLs.
//!
//! A function URL with `AWS_IAM` auth only accepts requests signed for the `lambda`
//! service. This crate takes the request CloudFront is about to send to its origin
//! (the `origin-request` event of Lambda@Edge), and when the origin is a function URL
//! (`<id>.lambda-url.<region>.on.aws`) rewrites the `host` header and adds a version 4
//! signature. Requests for any other origin are returned unchanged. This crate is part
//! of the [serverless-otlp-forwarder](https://github.com/dev7a/serverless-otlp-forwarder/)
//! project.
//!
//! # Example
//!
//! ```no_run
//! use lambda_url_signer::{
//!     CloudFrontEvent, EnvironmentCredentialSource, OriginRequestSigner, Outcome,
//! };
//!
//! fn handle(event: CloudFrontEvent) -> Result<(), Box<dyn std::error::Error>> {
//!     let signer = OriginRequestSigner::builder()
//!         .with_credential_source(EnvironmentCredentialSource::new())
//!         .build()?;
//!
//!     let request = event.into_first_record()?.cf.request;
//!     match signer.process(request)? {
//!         Outcome::Signed(request) => println!("signed {}", request.uri),
//!         Outcome::PassThrough(request) => println!("forwarded {}", request.uri),
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod event;
pub mod origin;
pub mod signing;

mod builder;
mod transform;

pub use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SessionTokenMode, UriPathNormalizationMode,
};
pub use builder::OriginRequestSignerBuilder;
pub use codec::{HeaderBag, QueryParameters, QueryValue};
pub use credentials::{CredentialSource, EnvironmentCredentialSource, StaticCredentialSource};
pub use error::{Error, ErrorKind, Result};
pub use event::{CloudFrontEvent, EdgeRequest};
pub use signing::{sign_request, SigningOptions};
pub use transform::{Clock, OriginRequestSigner, Outcome};
