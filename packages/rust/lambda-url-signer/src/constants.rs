//! Constants for the lambda-url-signer package.
//!
//! Environment variable names, protocol header names and defaults live here so the
//! codec, signer and orchestrator agree on a single spelling.

/// Environment variable names for configuration.
pub mod env_vars {
    /// Access key id used to sign origin requests.
    pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

    /// Secret access key used to derive the signing key.
    pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

    /// Session token of the temporary credentials.
    pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

    /// Log filter, takes precedence over `AWS_LAMBDA_LOG_LEVEL`.
    pub const RUST_LOG: &str = "RUST_LOG";

    /// Log level configured on the Lambda function.
    pub const LOG_LEVEL: &str = "AWS_LAMBDA_LOG_LEVEL";

    /// Log format configured on the Lambda function ("JSON" or "Text").
    pub const LOG_FORMAT: &str = "AWS_LAMBDA_LOG_FORMAT";
}

/// Default values for configuration parameters.
pub mod defaults {
    /// Signing name of Lambda function URLs.
    pub const SERVICE: &str = "lambda";

    /// Scheme function URLs are reached over.
    pub const PROTOCOL: &str = "https";

    /// Provider name recorded on credentials resolved from the environment.
    pub const CREDENTIALS_PROVIDER: &str = "edge-environment";
}

/// Header names read or written while signing.
pub mod headers {
    pub const HOST: &str = "host";
    pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
    pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

    pub const AUTHORIZATION: &str = "authorization";
    pub const X_AMZ_DATE: &str = "x-amz-date";
    pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
    pub const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

    /// Headers that are never part of a signature, whatever their value.
    pub const UNSIGNABLE: &[&str] = &[
        "authorization",
        "cache-control",
        "connection",
        "expect",
        "from",
        "keep-alive",
        "max-forwards",
        "pragma",
        "referer",
        "te",
        "trailer",
        "transfer-encoding",
        "upgrade",
        "user-agent",
        "x-amzn-trace-id",
    ];

    /// Prefixes of header families that are never signed.
    pub const UNSIGNABLE_PREFIXES: &[&str] = &["proxy-", "sec-"];
}
