//! User operations.

use serde_json::Value;

use crate::client::{api_path, Client};
use crate::error::SirportlyError;
use crate::models::{NewUser, RequestOptions};

impl Client {
    /// Creates a user.
    ///
    /// Email, first and last name are sent in the query string together with
    /// any extra fields on `user`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let user = NewUser::new("jo@example.com", "Jo", "Bloggs")
    ///     .with_field("company", "Acme");
    /// client.create_user(user).await?;
    /// ```
    pub async fn create_user(&self, user: NewUser) -> Result<Value, SirportlyError> {
        let params = user.sanitize().to_params()?;
        self.dispatch(
            &api_path("/users/create"),
            RequestOptions::post().query_params(params),
        )
        .await
    }
}
