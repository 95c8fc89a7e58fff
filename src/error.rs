use thiserror::Error;

/// Rejected command-line input or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email format for {email}.")]
    InvalidEmail { email: String },

    #[error(
        "The number of emails, passwords, and providers should match \
         (got {emails} emails, {passwords} passwords, {providers} providers)."
    )]
    LengthMismatch {
        emails: usize,
        passwords: usize,
        providers: usize,
    },

    #[error("Malformed secret '{token}': expected provider:secret.")]
    MalformedSecret { token: String },

    #[error("Paired secrets need one secret per email (got {emails} emails, {secrets} secrets).")]
    SecretCountMismatch { emails: usize, secrets: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The existing ledger string could not be turned back into accounts.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{var} is set but is not valid UTF-8")]
    NotUnicode { var: String },

    #[error("ledger is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ledger is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("ledger is not a JSON object of accounts: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to serialize ledger: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("rendered ledger is not valid UTF-8: {0}")]
    Render(#[source] std::string::FromUtf8Error),
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
