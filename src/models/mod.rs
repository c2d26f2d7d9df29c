//! Data models for the Sirportly API.
//!
//! This module contains the per-call request options, the error envelope
//! the service returns on failure, and typed inputs for the convenience
//! operations. Success payloads are not modelled.

mod envelope;
mod inputs;
mod options;

pub use envelope::*;
pub use inputs::*;
pub use options::*;
