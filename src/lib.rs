pub mod codec;
pub mod config;
pub mod error;
pub mod merge;
pub mod models;
pub mod monitoring;
pub mod report;
pub mod validation;

pub use error::{DecodeError, LedgerError, ValidationError};
pub use models::{Account, Ledger};
