//! Ticket operations.

use serde_json::Value;

use super::validate_reference;
use crate::client::{api_path, Client};
use crate::error::SirportlyError;
use crate::models::{MacroRef, Params, RequestOptions};

/// Page requested by [`Client::tickets`] when none is given.
pub const DEFAULT_PAGE: u32 = 1;

impl Client {
    /// Gets a single ticket by reference.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let ticket = client.ticket("AB-123456").await?;
    /// println!("{}", ticket["subject"]);
    /// ```
    pub async fn ticket(&self, reference: &str) -> Result<Value, SirportlyError> {
        let reference = validate_reference(reference)?;
        self.dispatch(
            &api_path("/tickets/ticket"),
            RequestOptions::get().query("ticket", reference),
        )
        .await
    }

    /// Lists tickets, one page at a time (page 1 when `None`).
    pub async fn tickets(&self, page: Option<u32>) -> Result<Value, SirportlyError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        self.dispatch(
            &api_path("/tickets/all"),
            RequestOptions::get().query("page", page),
        )
        .await
    }

    /// Submits a new ticket. `params` are sent as-is in the query string.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let params = Params::new()
    ///     .with("subject", "Printer on fire")
    ///     .with("name", "Jo Bloggs")
    ///     .with("email", "jo@example.com")
    ///     .with("status", "New")
    ///     .with("priority", "Urgent")
    ///     .with("team", "Support")
    ///     .with("department", "General");
    /// let ticket = client.submit_ticket(params).await?;
    /// ```
    pub async fn submit_ticket(&self, params: Params) -> Result<Value, SirportlyError> {
        self.dispatch(
            &api_path("/tickets/submit"),
            RequestOptions::post().query_params(params),
        )
        .await
    }

    /// Posts an update (reply or note) to a ticket.
    pub async fn post_update(
        &self,
        reference: &str,
        fields: Params,
    ) -> Result<Value, SirportlyError> {
        self.post_ticket_fields("/tickets/post_update", reference, fields)
            .await
    }

    /// Changes ticket properties (status, priority, team, ...).
    pub async fn update_ticket(
        &self,
        reference: &str,
        fields: Params,
    ) -> Result<Value, SirportlyError> {
        self.post_ticket_fields("/tickets/update", reference, fields)
            .await
    }

    /// Runs a macro against a ticket.
    pub async fn run_macro(
        &self,
        reference: &str,
        macro_ref: impl Into<MacroRef>,
    ) -> Result<Value, SirportlyError> {
        let reference = validate_reference(reference)?;
        let macro_ref = macro_ref.into();
        if matches!(&macro_ref, MacroRef::Name(name) if name.trim().is_empty()) {
            return Err(SirportlyError::validation("macro is required"));
        }

        self.dispatch(
            &api_path("/tickets/macro"),
            RequestOptions::get()
                .query("ticket", reference)
                .query("macro", macro_ref),
        )
        .await
    }

    /// Schedules a follow-up on a ticket.
    pub async fn add_follow_up(
        &self,
        reference: &str,
        fields: Params,
    ) -> Result<Value, SirportlyError> {
        self.post_ticket_fields("/tickets/add_followup", reference, fields)
            .await
    }

    /// Runs an SPQL query.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let rows = client
    ///     .spql("SELECT COUNT FROM tickets WHERE status.status_type = 0")
    ///     .await?;
    /// ```
    pub async fn spql(&self, query: &str) -> Result<Value, SirportlyError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SirportlyError::validation("SPQL query is required"));
        }

        self.dispatch(
            &api_path("/tickets/spql"),
            RequestOptions::post().form("spql", query),
        )
        .await
    }

    /// POSTs `fields` as a form body to a ticket endpoint keyed by reference.
    async fn post_ticket_fields(
        &self,
        suffix: &str,
        reference: &str,
        fields: Params,
    ) -> Result<Value, SirportlyError> {
        let reference = validate_reference(reference)?;
        self.dispatch(
            &api_path(suffix),
            RequestOptions::post()
                .query("ticket", reference)
                .form_params(fields),
        )
        .await
    }
}
