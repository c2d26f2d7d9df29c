//! Typed inputs for the convenience operations.
//!
//! # Input Sanitization
//!
//! Inputs implement `sanitize()`, which trims whitespace from string fields.
//! The client calls it before building a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Params;
use crate::error::SirportlyError;

/// A new user for `users/create`.
///
/// Email and names are required by the service; anything else goes in
/// `extra` and is sent alongside them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    /// Email address.
    pub email: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Additional fields (e.g. `company`, `job_title`).
    #[serde(default)]
    pub extra: Params,
}

impl NewUser {
    /// Creates a user from the three required fields.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            extra: Params::new(),
        }
    }

    /// Adds an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Sanitizes input by trimming whitespace from the required fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            extra: self.extra,
        }
    }

    /// Converts to request parameters.
    ///
    /// Extra fields are applied first, so they never override the required
    /// ones.
    ///
    /// # Errors
    ///
    /// Returns `SirportlyError::Validation` if the email is blank.
    pub fn to_params(&self) -> Result<Params, SirportlyError> {
        if self.email.is_empty() {
            return Err(SirportlyError::validation("email is required"));
        }

        let mut params = self.extra.clone();
        params.insert("email", &self.email);
        params.insert("first_name", &self.first_name);
        params.insert("last_name", &self.last_name);
        Ok(params)
    }
}

/// Identifies a macro by numeric ID or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MacroRef {
    /// Numeric macro ID.
    Id(u64),
    /// Macro name.
    Name(String),
}

impl fmt::Display for MacroRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroRef::Id(id) => write!(f, "{}", id),
            MacroRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for MacroRef {
    fn from(id: u64) -> Self {
        MacroRef::Id(id)
    }
}

impl From<&str> for MacroRef {
    fn from(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| MacroRef::Name(name.to_string()))
    }
}

impl From<String> for MacroRef {
    fn from(name: String) -> Self {
        MacroRef::from(name.as_str())
    }
}

impl FromStr for MacroRef {
    type Err = SirportlyError;

    /// Digits become an ID; anything else non-blank is a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SirportlyError::validation("macro is required"));
        }
        Ok(s.parse::<u64>()
            .map(MacroRef::Id)
            .unwrap_or_else(|_| MacroRef::Name(s.to_string())))
    }
}

/// Object collections exposed under `/objects/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Ticket statuses.
    Statuses,
    /// Ticket priorities.
    Priorities,
    /// Teams.
    Teams,
    /// Brands.
    Brands,
    /// Departments.
    Departments,
    /// Escalation paths.
    EscalationPaths,
    /// Service level agreements.
    Slas,
    /// Saved ticket filters.
    Filters,
}

impl ObjectKind {
    /// Every object collection, in documentation order.
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::Statuses,
        ObjectKind::Priorities,
        ObjectKind::Teams,
        ObjectKind::Brands,
        ObjectKind::Departments,
        ObjectKind::EscalationPaths,
        ObjectKind::Slas,
        ObjectKind::Filters,
    ];

    /// The path segment for this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Statuses => "statuses",
            ObjectKind::Priorities => "priorities",
            ObjectKind::Teams => "teams",
            ObjectKind::Brands => "brands",
            ObjectKind::Departments => "departments",
            ObjectKind::EscalationPaths => "escalation_paths",
            ObjectKind::Slas => "slas",
            ObjectKind::Filters => "filters",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = SirportlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| SirportlyError::validation(format!("unknown object type: {:?}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_sanitize_and_params() {
        let user = NewUser::new("  jo@example.com ", " Jo", "Bloggs ")
            .with_field("company", "Acme")
            .sanitize();
        let params = user.to_params().unwrap();
        assert_eq!(params.get("email"), Some("jo@example.com"));
        assert_eq!(params.get("first_name"), Some("Jo"));
        assert_eq!(params.get("last_name"), Some("Bloggs"));
        assert_eq!(params.get("company"), Some("Acme"));
    }

    #[test]
    fn test_new_user_extra_cannot_override_required() {
        let user = NewUser::new("jo@example.com", "Jo", "Bloggs").with_field("email", "other@x");
        let params = user.to_params().unwrap();
        assert_eq!(params.get("email"), Some("jo@example.com"));
    }

    #[test]
    fn test_new_user_requires_email() {
        let err = NewUser::new("  ", "Jo", "Bloggs").sanitize().to_params().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_new_user_deserialize_extra() {
        let user: NewUser = serde_json::from_str(
            r#"{"email":"a@b.c","first_name":"A","last_name":"B","extra":{"pin":1234}}"#,
        )
        .unwrap();
        assert_eq!(user.extra.get("pin"), Some("1234"));
    }

    #[test]
    fn test_macro_ref_parse() {
        assert_eq!("42".parse::<MacroRef>().unwrap(), MacroRef::Id(42));
        assert_eq!(
            " Close & notify ".parse::<MacroRef>().unwrap(),
            MacroRef::Name("Close & notify".to_string())
        );
        assert!("".parse::<MacroRef>().is_err());
        assert_eq!(MacroRef::from("7"), MacroRef::Id(7));
        assert_eq!(MacroRef::Id(7).to_string(), "7");
    }

    #[test]
    fn test_object_kind_round_trips_names() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.as_str().parse::<ObjectKind>().unwrap(), kind);
        }
        assert_eq!(
            "escalation-paths".parse::<ObjectKind>().unwrap(),
            ObjectKind::EscalationPaths
        );
        assert!("widgets".parse::<ObjectKind>().is_err());
    }
}
