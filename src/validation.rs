//! Command-line input checks.
//!
//! Everything here runs before the existing ledger is touched, so a bad
//! argument never results in a partially applied merge.

use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::SecretToken;

/// Accepts `local@domain.tld`: exactly one `@`, a non-empty local part, and
/// a dot in the domain with text on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Need some dot that is neither the first nor the last character
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Emails, passwords and providers are zipped together, so they must line up.
pub fn validate_lengths(
    emails: &[String],
    passwords: &[String],
    providers: &[String],
) -> Result<(), ValidationError> {
    if emails.len() == passwords.len() && passwords.len() == providers.len() {
        Ok(())
    } else {
        Err(ValidationError::LengthMismatch {
            emails: emails.len(),
            passwords: passwords.len(),
            providers: providers.len(),
        })
    }
}

impl FromStr for SecretToken {
    type Err = ValidationError;

    /// Splits on the first `:` only; the secret itself may contain colons.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.split_once(':') {
            Some((provider, secret)) if !provider.is_empty() => Ok(Self {
                provider: provider.to_string(),
                secret: secret.to_string(),
            }),
            _ => Err(ValidationError::MalformedSecret {
                token: token.to_string(),
            }),
        }
    }
}

pub fn parse_secrets(tokens: &[String]) -> Result<Vec<SecretToken>, ValidationError> {
    tokens.iter().map(|t| t.parse()).collect()
}
