//! Convenience operations for the Sirportly API.
//!
//! Each operation is a fixed path under `/api/v2` plus a parameter mapping,
//! sent through [`Client::dispatch`](crate::client::Client::dispatch). They
//! all resolve to the raw JSON body on success and share its error contract.

mod objects;
mod tickets;
mod users;

pub use tickets::DEFAULT_PAGE;

use crate::error::SirportlyError;

/// Trims a ticket reference and rejects blank ones.
pub(crate) fn validate_reference(reference: &str) -> Result<&str, SirportlyError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(SirportlyError::validation("ticket reference is required"));
    }
    Ok(reference)
}
