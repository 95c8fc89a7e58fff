use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::LedgerError;
use crate::models::Ledger;

pub const SEPARATOR: &str = "-----------------------------------------------";

/// Pretty JSON with four-space indentation.
pub fn to_pretty_json(ledger: &Ledger) -> Result<String, LedgerError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    ledger.serialize(&mut serializer).map_err(LedgerError::Encode)?;
    String::from_utf8(buf).map_err(LedgerError::Render)
}

/// A separator line, the prompt, then the ledger dump.
pub fn render_ledger(prompt: &str, ledger: &Ledger) -> Result<String, LedgerError> {
    Ok(format!("{SEPARATOR}\n{prompt}\n{}", to_pretty_json(ledger)?))
}
