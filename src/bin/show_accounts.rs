use anyhow::{Context, Result};

use test_accounts::{codec::decode_ledger, config::Config, report::render_ledger};

fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;

    let Some(encoded) = config.current_ledger()? else {
        println!("{} is not set.", config.accounts_var);
        return Ok(());
    };

    let ledger = decode_ledger(Some(&encoded))
        .with_context(|| format!("Failed to decode {}", config.accounts_var))?;

    println!("{}", render_ledger(&format!("{} ({} accounts):", config.accounts_var, ledger.len()), &ledger)?);

    let mut emails = ledger.iter().map(|(email, _)| email.as_str()).peekable();
    if emails.peek().is_some() {
        println!("\nEmails:");
        for email in emails {
            println!("  {email}");
        }
    }

    Ok(())
}
