// Application layer - the ledger service and its error type.
// Callers (CLI, tests, embedding programs) go through LedgerService only.

pub mod error;
mod service;

pub use error::*;
pub use service::*;
