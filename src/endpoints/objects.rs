//! Object lookups: statuses, priorities, teams and the other collections
//! configured in the helpdesk.

use serde_json::Value;

use crate::client::{api_path, Client};
use crate::error::SirportlyError;
use crate::models::{ObjectKind, RequestOptions};

impl Client {
    /// Lists one object collection.
    pub async fn objects(&self, kind: ObjectKind) -> Result<Value, SirportlyError> {
        let path = api_path(&format!("/objects/{}", kind.as_str()));
        self.dispatch(&path, RequestOptions::get()).await
    }

    /// Lists ticket statuses.
    pub async fn statuses(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Statuses).await
    }

    /// Lists ticket priorities.
    pub async fn priorities(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Priorities).await
    }

    /// Lists teams.
    pub async fn teams(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Teams).await
    }

    /// Lists brands.
    pub async fn brands(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Brands).await
    }

    /// Lists departments.
    pub async fn departments(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Departments).await
    }

    /// Lists escalation paths.
    pub async fn escalation_paths(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::EscalationPaths).await
    }

    /// Lists SLAs.
    pub async fn slas(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Slas).await
    }

    /// Lists saved filters.
    pub async fn filters(&self) -> Result<Value, SirportlyError> {
        self.objects(ObjectKind::Filters).await
    }
}
