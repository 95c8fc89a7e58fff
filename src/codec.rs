use base64::{Engine as _, engine::general_purpose};
use tracing::debug;

use crate::error::{DecodeError, LedgerError};
use crate::models::Ledger;

/// Decode an existing `base64(JSON)` ledger.
///
/// `None`, empty, or whitespace-only input yields an empty ledger. Anything
/// else must decode cleanly; malformed input is an error, never dropped.
pub fn decode_ledger(encoded: Option<&str>) -> Result<Ledger, DecodeError> {
    let encoded = match encoded.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            debug!("No existing ledger, starting empty");
            return Ok(Ledger::new());
        }
    };

    let bytes = general_purpose::STANDARD.decode(encoded)?;
    let json = String::from_utf8(bytes)?;
    let ledger: Ledger = serde_json::from_str(&json)?;

    debug!("Decoded ledger with {} accounts", ledger.len());
    Ok(ledger)
}

/// Serialize a ledger to compact JSON and base64 it.
pub fn encode_ledger(ledger: &Ledger) -> Result<String, LedgerError> {
    let json = serde_json::to_vec(ledger).map_err(LedgerError::Encode)?;
    Ok(general_purpose::STANDARD.encode(json))
}
