use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Key used for a legacy string secret when the account has no provider.
pub const LEGACY_SECRET_KEY: &str = "default";

/// One test user's credentials.
///
/// An empty `provider` is left out of the encoded form, so entries written
/// without one keep that shape. `secret` is always written, as `{}` when
/// there are no secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAccount")]
pub struct Account {
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
    /// Provider name -> secret value. Serialized as `secret`.
    #[serde(rename = "secret")]
    pub secrets: BTreeMap<String, String>,
    /// Fields this tool does not manage, carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Account {
    pub fn new(password: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            provider: provider.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper, mostly for tests.
    pub fn with_secret(mut self, provider: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(provider.into(), secret.into());
        self
    }
}

// On-the-wire account shape, tolerant of older ledgers
#[derive(Deserialize)]
struct RawAccount {
    #[serde(default)]
    password: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    secret: Option<SecretField>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretField {
    /// Current format: provider -> secret
    Map(BTreeMap<String, String>),
    /// Legacy format: a single secret string
    Legacy(String),
}

impl From<RawAccount> for Account {
    fn from(raw: RawAccount) -> Self {
        let secrets = match raw.secret {
            None => BTreeMap::new(),
            Some(SecretField::Map(map)) => map,
            Some(SecretField::Legacy(secret)) => {
                let key = if raw.provider.is_empty() {
                    LEGACY_SECRET_KEY.to_string()
                } else {
                    raw.provider.clone()
                };
                warn!("Upgrading legacy string secret to map entry '{}'", key);
                BTreeMap::from([(key, secret)])
            }
        };

        Self {
            password: raw.password,
            provider: raw.provider,
            secrets,
            extra: raw.extra,
        }
    }
}

/// All test accounts, keyed by email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, email: &str) -> Option<&Account> {
        self.accounts.get(email)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    pub fn insert(&mut self, email: impl Into<String>, account: Account) -> Option<Account> {
        self.accounts.insert(email.into(), account)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Account)> {
        self.accounts.iter()
    }

    /// Create the account if missing, then overwrite its password and provider.
    ///
    /// Returns the account and whether it was newly created. Existing secrets
    /// and extra fields are left in place.
    pub fn upsert(&mut self, email: &str, password: &str, provider: &str) -> (&mut Account, bool) {
        let created = !self.contains(email);
        let account = self.accounts.entry(email.to_string()).or_default();
        account.password = password.to_string();
        account.provider = provider.to_string();
        (account, created)
    }
}

impl FromIterator<(String, Account)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (String, Account)>>(iter: I) -> Self {
        Self {
            accounts: iter.into_iter().collect(),
        }
    }
}

/// A CLI-supplied `provider:secret` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretToken {
    pub provider: String,
    pub secret: String,
}

/// One (email, password, provider) triple from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInput {
    pub email: String,
    pub password: String,
    pub provider: String,
}
