//! Credential sources for the signer.
//!
//! Credentials are resolved on every invocation: the execution environment can be
//! recycled and temporary credentials rotated at any time, so nothing is cached here.

use aws_credential_types::Credentials;
use std::fmt::Debug;

use crate::constants::{defaults, env_vars};
use crate::error::{Error, Result};

/// Looks up a configuration value by name.
pub type LookupFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves the credentials to sign one request with.
pub trait CredentialSource: Send + Sync {
    /// Returns complete credentials or [`Error::MissingCredentials`].
    fn resolve(&self) -> Result<Credentials>;
}

/// Reads the access key, secret key and session token from the environment.
pub struct EnvironmentCredentialSource {
    lookup: LookupFn,
}

impl Debug for EnvironmentCredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCredentialSource")
            .field("lookup", &format_args!("<function>"))
            .finish()
    }
}

impl Default for EnvironmentCredentialSource {
    fn default() -> Self {
        Self::with_lookup(Box::new(|name| std::env::var(name).ok()))
    }
}

impl EnvironmentCredentialSource {
    /// Source backed by the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source backed by an arbitrary lookup, e.g. a map in tests.
    pub fn with_lookup(lookup: LookupFn) -> Self {
        Self { lookup }
    }

    fn required(&self, variable: &'static str) -> Result<String> {
        (self.lookup)(variable)
            .filter(|value| !value.is_empty())
            .ok_or(Error::MissingCredentials { variable })
    }
}

impl CredentialSource for EnvironmentCredentialSource {
    fn resolve(&self) -> Result<Credentials> {
        let access_key_id = self.required(env_vars::ACCESS_KEY_ID)?;
        let secret_access_key = self.required(env_vars::SECRET_ACCESS_KEY)?;
        let session_token = self.required(env_vars::SESSION_TOKEN)?;

        Ok(Credentials::new(
            access_key_id,
            secret_access_key,
            Some(session_token),
            None,
            defaults::CREDENTIALS_PROVIDER,
        ))
    }
}

/// Always returns the same credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentialSource {
    credentials: Credentials,
}

impl StaticCredentialSource {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialSource for StaticCredentialSource {
    fn resolve(&self) -> Result<Credentials> {
        ensure_complete(&self.credentials)?;
        Ok(self.credentials.clone())
    }
}

/// Checks that all three values needed for signing are present.
pub fn ensure_complete(credentials: &Credentials) -> Result<()> {
    if credentials.access_key_id().is_empty() {
        return Err(Error::MissingCredentials {
            variable: env_vars::ACCESS_KEY_ID,
        });
    }
    if credentials.secret_access_key().is_empty() {
        return Err(Error::MissingCredentials {
            variable: env_vars::SECRET_ACCESS_KEY,
        });
    }
    if credentials.session_token().map_or(true, str::is_empty) {
        return Err(Error::MissingCredentials {
            variable: env_vars::SESSION_TOKEN,
        });
    }
    Ok(())
}
