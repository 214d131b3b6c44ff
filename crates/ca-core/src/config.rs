//! Credentials loading and validation
//!
//! The remote API is reached with static basic auth scoped to a subdomain.
//! All three fields are required; construction fails fast on the first
//! empty one.

use serde::{Deserialize, Serialize};

use crate::error::CaError;
use crate::result::CaResult;

/// Basic-auth credentials plus the account subdomain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub subdomain: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build and validate credentials. Every field must be non-empty.
    pub fn new(
        subdomain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> CaResult<Self> {
        let credentials = Self {
            subdomain: subdomain.into(),
            username: username.into(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Load credentials from `COSTAGENT_SUBDOMAIN`, `COSTAGENT_USERNAME`
    /// and `COSTAGENT_PASSWORD`.
    pub fn from_env() -> CaResult<Self> {
        Self::new(
            std::env::var("COSTAGENT_SUBDOMAIN").unwrap_or_default(),
            std::env::var("COSTAGENT_USERNAME").unwrap_or_default(),
            std::env::var("COSTAGENT_PASSWORD").unwrap_or_default(),
        )
    }

    /// Check that every field is non-empty. Construction through [`Credentials::new`]
    /// already does this; callers accepting a `Credentials` value directly can
    /// re-check before use.
    pub fn validate(&self) -> CaResult<()> {
        for (field, value) in [
            ("subdomain", &self.subdomain),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.is_empty() {
                return Err(CaError::Config { field });
            }
        }
        Ok(())
    }
}
