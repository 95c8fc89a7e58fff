use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use test_accounts::{
    config::Config,
    merge::{merge, MergeRequest, SecretScope},
    report::{render_ledger, SEPARATOR},
};

#[derive(Parser)]
#[command(name = "test-accounts")]
#[command(about = "Add multiple users to the TEST_ACCOUNTS environment variable", long_about = None)]
struct Cli {
    /// User emails separated by space
    #[arg(long, num_args = 1.., required = true)]
    emails: Vec<String>,

    /// User passwords separated by space
    #[arg(long, num_args = 1.., required = true)]
    passwords: Vec<String>,

    /// Auth providers separated by space
    #[arg(long, num_args = 1.., required = true)]
    providers: Vec<String>,

    /// Provider secrets as provider:secret, separated by space
    #[arg(long, num_args = 0..)]
    secrets: Vec<String>,

    /// Which accounts each secret is written to (overrides SECRET_SCOPE)
    #[arg(long, value_enum)]
    secret_scope: Option<SecretScope>,

    /// Existing encoded ledger (defaults to the configured variable)
    #[arg(long)]
    ledger: Option<String>,

    /// Print only the encoded string
    #[arg(long)]
    encoded_only: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    // Logs go to stderr; stdout is reserved for the ledger output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let scope = cli.secret_scope.unwrap_or(config.secret_scope);
    let request = MergeRequest::from_lists(
        &cli.emails,
        &cli.passwords,
        &cli.providers,
        &cli.secrets,
        scope,
    )?;
    info!("Merging {} accounts with secret scope '{}'", request.accounts.len(), scope);

    let current = match cli.ledger {
        Some(ledger) => Some(ledger),
        None => config.current_ledger()?,
    };
    let outcome = merge(current.as_deref(), &request)
        .with_context(|| format!("Failed to update {}", config.accounts_var))?;

    if cli.encoded_only {
        println!("{}", outcome.encoded);
        return Ok(());
    }

    println!(
        "This script will help you generate a base64 encoded string that can be used to set the {} \
         environment variable.",
        config.accounts_var
    );
    println!(
        "The {} environment variable is used to authenticate users in the test environment.",
        config.accounts_var
    );

    println!("{}", render_ledger("Current data:", &outcome.before)?);
    println!("{}", render_ledger("New data:", &outcome.after)?);
    println!("{SEPARATOR}");

    println!("Base64 Encoded Serialized Data:");
    println!("{}", outcome.encoded);

    Ok(())
}
