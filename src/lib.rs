//! # Sirportly
//!
//! A client for the [Sirportly](https://sirportly.com) helpdesk HTTP API.
//!
//! Every request is authenticated with a static token/secret pair, sent to
//! `{protocol}://{server}:{port}/api/v2/...`, and resolved to the raw JSON
//! body on success or a [`SirportlyError`] on failure.
//!
//! ## Features
//!
//! - **Tickets**: fetch, list, submit, update, post updates, run macros,
//!   add follow-ups
//! - **Objects**: statuses, priorities, teams, brands, departments,
//!   escalation paths, SLAs, filters
//! - **Users**: create
//! - **SPQL**: run queries
//! - **Callbacks**: any operation can complete through a `FnOnce` handler
//!   instead of being awaited
//! - **Security**: credentials are never logged or echoed in error messages
//!
//! ## Architecture
//!
//! - [`config`] - Options, defaults and validation
//! - [`error`] - The error type and credential sanitization
//! - [`client`] - The client and its request dispatcher
//! - [`models`] - Request options, the error envelope, operation inputs
//! - [`endpoints`] - The convenience operations
//!
//! ## Configuration
//!
//! Required: `token`, `secret`, `server`. Optional: `protocol` (`http`),
//! `port` (`80`), `timeout_secs` (none). From the environment:
//!
//! - `SIRPORTLY_TOKEN`, `SIRPORTLY_SECRET`, `SIRPORTLY_SERVER`
//! - `SIRPORTLY_PROTOCOL`, `SIRPORTLY_PORT`, `SIRPORTLY_TIMEOUT_SECS`
//!
//! ## Example
//!
//! ```ignore
//! use sirportly::{Client, ClientOptions, Params};
//!
//! async fn example() -> Result<(), sirportly::SirportlyError> {
//!     let client = Client::new(
//!         ClientOptions::new()
//!             .with_token("token")
//!             .with_secret("secret")
//!             .with_server("support.example.com"),
//!     )?;
//!
//!     let ticket = client.ticket("AB-123456").await?;
//!     println!("{}", ticket["subject"]);
//!
//!     client
//!         .post_update("AB-123456", Params::new().with("message", "On it."))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Callback style:
//!
//! ```ignore
//! client.dispatch_with(
//!     "/api/v2/tickets/all",
//!     RequestOptions::get().query("page", 2),
//!     Some(|result: Result<serde_json::Value, SirportlyError>| match result {
//!         Ok(page) => println!("{page}"),
//!         Err(e) => eprintln!("{e}"),
//!     }),
//! )?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::{spawn_completion, Client, API_PREFIX};
pub use config::{ClientOptions, Config, Protocol};
pub use error::SirportlyError;
pub use models::{ErrorEnvelope, MacroRef, NewUser, ObjectKind, Params, RequestOptions};
pub use reqwest::Method;
