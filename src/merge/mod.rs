use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::{
    codec::{decode_ledger, encode_ledger},
    error::{Result, ValidationError},
    models::{AccountInput, Ledger, SecretToken},
    monitoring::MergeStats,
    validation::{parse_secrets, validate_email, validate_lengths},
};

/// Which accounts a secret token is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SecretScope {
    /// Every token goes to every account updated in the run
    #[default]
    All,
    /// Token i goes to account i only
    Paired,
}

impl SecretScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretScope::All => "all",
            SecretScope::Paired => "paired",
        }
    }
}

impl fmt::Display for SecretScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SecretScope::All),
            "paired" => Ok(SecretScope::Paired),
            other => Err(ValidationError::InvalidConfig(format!(
                "unknown secret scope '{other}', expected 'all' or 'paired'"
            ))),
        }
    }
}

/// A fully validated set of updates. Applying one cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub accounts: Vec<AccountInput>,
    pub secrets: Vec<SecretToken>,
    pub scope: SecretScope,
}

impl MergeRequest {
    /// Validate raw CLI lists and zip them into a request.
    ///
    /// Checks list lengths, then every email, then every secret token.
    pub fn from_lists(
        emails: &[String],
        passwords: &[String],
        providers: &[String],
        secrets: &[String],
        scope: SecretScope,
    ) -> Result<Self, ValidationError> {
        validate_lengths(emails, passwords, providers)?;

        for email in emails {
            validate_email(email)?;
        }

        let secrets = parse_secrets(secrets)?;

        if scope == SecretScope::Paired && secrets.len() != emails.len() {
            return Err(ValidationError::SecretCountMismatch {
                emails: emails.len(),
                secrets: secrets.len(),
            });
        }

        let accounts = emails
            .iter()
            .zip(passwords)
            .zip(providers)
            .map(|((email, password), provider)| AccountInput {
                email: email.clone(),
                password: password.clone(),
                provider: provider.clone(),
            })
            .collect();

        Ok(Self { accounts, secrets, scope })
    }

    /// Secret tokens that apply to the account at `index`.
    fn secrets_for(&self, index: usize) -> &[SecretToken] {
        match self.scope {
            SecretScope::All => &self.secrets,
            SecretScope::Paired => self
                .secrets
                .get(index)
                .map(std::slice::from_ref)
                .unwrap_or_default(),
        }
    }
}

/// Apply a request to a ledger in place.
pub fn apply(ledger: &mut Ledger, request: &MergeRequest) -> MergeStats {
    let mut stats = MergeStats::default();

    for (index, input) in request.accounts.iter().enumerate() {
        let (account, created) = ledger.upsert(&input.email, &input.password, &input.provider);

        if created {
            info!("Created account {}", input.email);
            stats.increment_created();
        } else {
            info!("Updated account {}", input.email);
            stats.increment_updated();
        }

        for token in request.secrets_for(index) {
            debug!("Setting {} secret for {}", token.provider, input.email);
            account
                .secrets
                .insert(token.provider.clone(), token.secret.clone());
            stats.increment_secrets();
        }
    }

    stats
}

/// Result of a merge: both ledger states and the new encoded string.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub before: Ledger,
    pub after: Ledger,
    pub encoded: String,
    pub stats: MergeStats,
}

/// Decode `current`, apply `request`, and re-encode.
///
/// The caller owns persistence: nothing is read from or written to the
/// environment here.
pub fn merge(current: Option<&str>, request: &MergeRequest) -> Result<MergeOutcome> {
    let before = decode_ledger(current)?;
    info!("Current ledger holds {} accounts", before.len());

    let mut after = before.clone();
    let stats = apply(&mut after, request);
    let encoded = encode_ledger(&after)?;

    stats.log();

    Ok(MergeOutcome {
        before,
        after,
        encoded,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_ledger;
    use crate::error::LedgerError;
    use crate::models::Account;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn request(
        emails: &[&str],
        passwords: &[&str],
        providers: &[&str],
        secrets: &[&str],
        scope: SecretScope,
    ) -> MergeRequest {
        MergeRequest::from_lists(
            &strings(emails),
            &strings(passwords),
            &strings(providers),
            &strings(secrets),
            scope,
        )
        .unwrap()
    }

    #[test]
    fn test_new_account_from_empty_ledger() {
        let req = request(&["a@x.com"], &["p1"], &["google"], &["google:s1"], SecretScope::All);
        let outcome = merge(None, &req).unwrap();

        assert!(outcome.before.is_empty());
        assert_eq!(
            serde_json::to_value(&outcome.after).unwrap(),
            serde_json::json!({
                "a@x.com": {"provider": "google", "password": "p1", "secret": {"google": "s1"}}
            })
        );
        assert_eq!(
            outcome.stats,
            MergeStats { accounts_created: 1, accounts_updated: 0, secrets_applied: 1 }
        );
    }

    #[test]
    fn test_existing_account_updated_others_untouched() {
        let mut ledger = Ledger::new();
        ledger.insert(
            "a@x.com",
            Account::new("old", "google")
                .with_secret("google", "g-old")
                .with_secret("apple", "a-keep"),
        );
        ledger.insert("b@y.org", Account::new("pb", "apple").with_secret("apple", "b"));
        let current = encode_ledger(&ledger).unwrap();

        let req = request(&["a@x.com"], &["new"], &["twitch"], &["google:g-new"], SecretScope::All);
        let outcome = merge(Some(&current), &req).unwrap();

        let a = outcome.after.get("a@x.com").unwrap();
        assert_eq!(a.password, "new");
        assert_eq!(a.provider, "twitch");
        assert_eq!(a.secrets.get("google").map(String::as_str), Some("g-new"));
        assert_eq!(a.secrets.get("apple").map(String::as_str), Some("a-keep"));
        assert_eq!(outcome.after.get("b@y.org"), ledger.get("b@y.org"));
        assert_eq!(outcome.before, ledger);
        assert_eq!(outcome.stats.accounts_updated, 1);
    }

    #[test]
    fn test_all_scope_fans_out_every_token() {
        let req = request(
            &["a@x.com", "b@y.org"],
            &["pa", "pb"],
            &["google", "apple"],
            &["google:g", "apple:a"],
            SecretScope::All,
        );
        let outcome = merge(None, &req).unwrap();

        for email in ["a@x.com", "b@y.org"] {
            let account = outcome.after.get(email).unwrap();
            assert_eq!(account.secrets.len(), 2, "{email} should get both secrets");
        }
        assert_eq!(outcome.stats.secrets_applied, 4);
    }

    #[test]
    fn test_later_token_wins_for_same_provider() {
        let req = request(&["a@x.com"], &["p"], &["google"], &["google:one", "google:two"], SecretScope::All);
        let outcome = merge(None, &req).unwrap();

        let account = outcome.after.get("a@x.com").unwrap();
        assert_eq!(account.secrets.get("google").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_paired_scope_keeps_secrets_per_account() {
        let req = request(
            &["a@x.com", "b@y.org"],
            &["pa", "pb"],
            &["google", "apple"],
            &["google:g", "apple:a"],
            SecretScope::Paired,
        );
        let outcome = merge(None, &req).unwrap();

        let a = outcome.after.get("a@x.com").unwrap();
        let b = outcome.after.get("b@y.org").unwrap();
        assert_eq!(a.secrets, Account::new("", "").with_secret("google", "g").secrets);
        assert_eq!(b.secrets, Account::new("", "").with_secret("apple", "a").secrets);
    }

    #[test]
    fn test_paired_scope_requires_matching_counts() {
        let err = MergeRequest::from_lists(
            &strings(&["a@x.com", "b@y.org"]),
            &strings(&["pa", "pb"]),
            &strings(&["google", "apple"]),
            &strings(&["google:g"]),
            SecretScope::Paired,
        )
        .unwrap_err();

        assert_eq!(err, ValidationError::SecretCountMismatch { emails: 2, secrets: 1 });
    }

    #[test]
    fn test_no_secrets_creates_empty_map() {
        let req = request(&["a@x.com"], &["p"], &["google"], &[], SecretScope::All);
        let outcome = merge(None, &req).unwrap();

        assert!(outcome.after.get("a@x.com").unwrap().secrets.is_empty());
    }

    #[test]
    fn test_validation_failures() {
        let one = strings(&["a@x.com"]);
        let bad_email = strings(&["not-an-email"]);
        let two = strings(&["p1", "p2"]);
        let none: Vec<String> = Vec::new();

        assert!(matches!(
            MergeRequest::from_lists(&one, &two, &one, &none, SecretScope::All),
            Err(ValidationError::LengthMismatch { .. })
        ));
        assert!(matches!(
            MergeRequest::from_lists(&bad_email, &one, &one, &none, SecretScope::All),
            Err(ValidationError::InvalidEmail { .. })
        ));
        assert!(matches!(
            MergeRequest::from_lists(&one, &one, &one, &strings(&["nocolon"]), SecretScope::All),
            Err(ValidationError::MalformedSecret { .. })
        ));
    }

    #[test]
    fn test_corrupt_current_ledger_aborts() {
        let req = request(&["a@x.com"], &["p"], &["google"], &[], SecretScope::All);
        let err = merge(Some("%%%"), &req).unwrap_err();

        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("all".parse::<SecretScope>().unwrap(), SecretScope::All);
        assert_eq!(" Paired ".parse::<SecretScope>().unwrap(), SecretScope::Paired);
        assert!("everyone".parse::<SecretScope>().is_err());
    }
}
