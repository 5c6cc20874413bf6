//! Log output for the function.
//!
//! The filter is read from `RUST_LOG` when set, otherwise from the function's
//! `AWS_LAMBDA_LOG_LEVEL`. Output is JSON when the function's log format is JSON.

use lambda_runtime::Error as LambdaError;
use lambda_url_signer::constants::env_vars;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, registry::Registry, EnvFilter};

/// Installs the global tracing subscriber.
pub fn init_tracing() -> Result<(), LambdaError> {
    let env_filter = EnvFilter::builder()
        .with_env_var(filter_env_var())
        .from_env_lossy();
    let subscriber = Registry::default().with(env_filter);

    if is_json_format(env::var(env_vars::LOG_FORMAT).ok().as_deref()) {
        tracing::subscriber::set_global_default(
            subscriber.with(fmt::layer().with_target(false).without_time().json()),
        )?;
    } else {
        tracing::subscriber::set_global_default(
            subscriber.with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_ansi(false),
            ),
        )?;
    }
    Ok(())
}

fn filter_env_var() -> &'static str {
    if env::var(env_vars::RUST_LOG).is_ok() {
        env_vars::RUST_LOG
    } else {
        env_vars::LOG_LEVEL
    }
}

fn is_json_format(value: Option<&str>) -> bool {
    value.unwrap_or_default().to_uppercase() == "JSON"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_is_json_format() {
        assert!(is_json_format(Some("JSON")));
        assert!(is_json_format(Some("json")));
        assert!(!is_json_format(Some("Text")));
        assert!(!is_json_format(None));
    }

    #[test]
    #[serial]
    fn test_filter_env_var_prefers_rust_log() {
        env::set_var(env_vars::RUST_LOG, "debug");
        assert_eq!(filter_env_var(), env_vars::RUST_LOG);

        env::remove_var(env_vars::RUST_LOG);
        assert_eq!(filter_env_var(), env_vars::LOG_LEVEL);
    }
}
