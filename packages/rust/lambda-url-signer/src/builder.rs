//! Builder pattern implementation for OriginRequestSigner

use chrono::Utc;
use std::fmt::Debug;
use std::sync::Arc;

use crate::constants::defaults;
use crate::credentials::CredentialSource;
use crate::error::{Error, Result};
use crate::signing::SigningOptions;
use crate::transform::{Clock, OriginRequestSigner};

/// Builder for configuring and creating an OriginRequestSigner
#[derive(Default)]
pub struct OriginRequestSignerBuilder {
    credential_source: Option<Arc<dyn CredentialSource>>,
    service: Option<String>,
    clock: Option<Clock>,
    options: Option<SigningOptions>,
}

impl Debug for OriginRequestSignerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginRequestSignerBuilder")
            .field(
                "credential_source",
                &self.credential_source.as_ref().map(|_| "<credential source>"),
            )
            .field("service", &self.service)
            .field("clock", &self.clock.as_ref().map(|_| "<function>"))
            .field("options", &self.options)
            .finish()
    }
}

impl OriginRequestSignerBuilder {
    /// Creates a new OriginRequestSignerBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets where credentials are resolved from on every request
    pub fn with_credential_source(mut self, source: impl CredentialSource + 'static) -> Self {
        self.credential_source = Some(Arc::new(source));
        self
    }

    /// Sets the signing name of the origin service (defaults to "lambda")
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the clock supplying the signing time (defaults to the system clock)
    ///
    /// # Example
    ///
    /// ```
    /// # use aws_credential_types::Credentials;
    /// # use chrono::{TimeZone, Utc};
    /// # use lambda_url_signer::{OriginRequestSignerBuilder, StaticCredentialSource};
    /// let credentials = Credentials::new(
    ///     "access_key",
    ///     "secret_key",
    ///     Some("session_token".to_string()),
    ///     None,
    ///     "example"
    /// );
    /// let fixed = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
    ///
    /// let signer = OriginRequestSignerBuilder::new()
    ///     .with_credential_source(StaticCredentialSource::new(credentials))
    ///     .with_clock(Box::new(move || fixed))
    ///     .build()
    ///     .expect("Failed to build signer");
    /// ```
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the `aws-sigv4` signing modes
    pub fn with_signing_options(mut self, options: SigningOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds the OriginRequestSigner with the configured parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentialSource`] if no credential source was set.
    pub fn build(self) -> Result<OriginRequestSigner> {
        let credentials = self
            .credential_source
            .ok_or(Error::MissingCredentialSource)?;
        let service = self
            .service
            .unwrap_or_else(|| defaults::SERVICE.to_string());
        let clock = self.clock.unwrap_or_else(|| Box::new(Utc::now));

        Ok(OriginRequestSigner::new(
            credentials,
            service,
            clock,
            self.options.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{EnvironmentCredentialSource, StaticCredentialSource};
    use aws_sigv4::http_request::{PayloadChecksumKind, PercentEncodingMode, SessionTokenMode};
    use aws_credential_types::Credentials;

    fn static_source() -> StaticCredentialSource {
        StaticCredentialSource::new(Credentials::new(
            "test",
            "test",
            Some("test".to_string()),
            None,
            "test",
        ))
    }

    #[test]
    fn test_builder_missing_credential_source() {
        let result = OriginRequestSignerBuilder::new().with_service("lambda").build();
        assert!(matches!(result.err(), Some(Error::MissingCredentialSource)));
    }

    #[test]
    fn test_builder_default_values() {
        let signer = OriginRequestSignerBuilder::new()
            .with_credential_source(static_source())
            .build()
            .unwrap();

        assert_eq!(signer.service(), "lambda");
        assert_eq!(signer.options(), &SigningOptions::default());
        assert_eq!(
            signer.options().percent_encoding_mode,
            PercentEncodingMode::Double
        );
        assert_eq!(
            signer.options().payload_checksum_kind,
            PayloadChecksumKind::XAmzSha256
        );
        assert_eq!(signer.options().session_token_mode, SessionTokenMode::Include);
    }

    #[test]
    fn test_builder_fluent_interface() {
        let options = SigningOptions {
            session_token_mode: SessionTokenMode::Exclude,
            payload_checksum_kind: PayloadChecksumKind::NoHeader,
            ..Default::default()
        };

        let signer = OriginRequestSignerBuilder::new()
            .with_credential_source(EnvironmentCredentialSource::new())
            .with_service("execute-api")
            .with_signing_options(options.clone())
            .with_credential_source(static_source()) // Test that we can override values
            .with_service("lambda")
            .build()
            .unwrap();

        assert_eq!(signer.service(), "lambda");
        assert_eq!(signer.options(), &options);
    }

    #[test]
    fn test_builder_debug_hides_functions() {
        let builder = OriginRequestSignerBuilder::new()
            .with_credential_source(static_source())
            .with_clock(Box::new(Utc::now));
        let rendered = format!("{builder:?}");
        assert!(rendered.contains("<credential source>"));
        assert!(rendered.contains("<function>"));
        assert!(!rendered.contains("test"));
    }
}
