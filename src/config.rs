use serde::{Deserialize, Serialize};
use std::env::{self, VarError};

use crate::error::{DecodeError, ValidationError};
use crate::merge::SecretScope;

pub const DEFAULT_ACCOUNTS_VAR: &str = "TEST_ACCOUNTS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the environment variable holding the encoded ledger.
    pub accounts_var: String,
    pub secret_scope: SecretScope,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts_var: DEFAULT_ACCOUNTS_VAR.to_string(),
            secret_scope: SecretScope::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ValidationError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Config {
            accounts_var: lookup("ACCOUNTS_VAR").unwrap_or(defaults.accounts_var),
            secret_scope: match lookup("SECRET_SCOPE") {
                Some(scope) => scope.parse()?,
                None => defaults.secret_scope,
            },
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.accounts_var.is_empty() {
            return Err(ValidationError::InvalidConfig(
                "ACCOUNTS_VAR must not be empty".to_string(),
            ));
        }

        if self.accounts_var.contains(['=', '\0']) {
            return Err(ValidationError::InvalidConfig(format!(
                "ACCOUNTS_VAR '{}' is not a usable variable name",
                self.accounts_var.escape_default()
            )));
        }

        Ok(())
    }

    /// Read the current encoded ledger, if the variable is set.
    ///
    /// A set but non-UTF-8 value is an error, not an absent ledger.
    pub fn current_ledger(&self) -> Result<Option<String>, DecodeError> {
        match env::var(&self.accounts_var) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(DecodeError::NotUnicode {
                var: self.accounts_var.clone(),
            }),
        }
    }
}
