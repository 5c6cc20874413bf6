//! Lambda@Edge function that signs CloudFront origin requests for Lambda function URLs.
//!
//! This function:
//! 1. Receives the CloudFront `origin-request` event
//! 2. Leaves requests for ordinary origins untouched
//! 3. Signs requests bound for `<id>.lambda-url.<region>.on.aws` with the function's
//!    own credentials, so the URL can use `AWS_IAM` auth
//! 4. Returns the request for CloudFront to forward

use anyhow::Context;
use lambda_runtime::{service_fn, Error as LambdaError, LambdaEvent, Runtime};
use lambda_url_signer::{
    CloudFrontEvent, EdgeRequest, EnvironmentCredentialSource, OriginRequestSigner,
};
use std::sync::Arc;

mod telemetry;

async fn function_handler(
    event: LambdaEvent<CloudFrontEvent>,
    signer: Arc<OriginRequestSigner>,
) -> Result<EdgeRequest, LambdaError> {
    let request_id = event.context.request_id;
    let record = event
        .payload
        .into_first_record()
        .context("Failed to read origin request event")?;

    let outcome = signer.process(record.cf.request).map_err(|e| {
        tracing::error!(request_id = %request_id, kind = ?e.kind(), "{}", e);
        e
    })?;

    tracing::debug!(request_id = %request_id, outcome = outcome.as_str(), "origin request processed");
    Ok(outcome.into_request())
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    telemetry::init_tracing()?;

    let signer = Arc::new(
        OriginRequestSigner::builder()
            .with_credential_source(EnvironmentCredentialSource::new())
            .build()?,
    );

    let runtime = Runtime::new(service_fn(|event| {
        let signer = Arc::clone(&signer);
        async move { function_handler(event, signer).await }
    }));
    runtime.run().await
}
