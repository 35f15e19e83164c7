//! Catalog action vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An operation the catalog API exposes for a resource type.
///
/// The lowercase name is the suffix of the endpoint path, e.g. `package_show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    Show,
    Create,
    Update,
    Delete,
    Patch,
}

impl Action {
    /// Every action the catalog vocabulary knows about
    pub const ALL: [Action; 6] = [
        Action::List,
        Action::Show,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Patch,
    ];

    /// Actions accepted by a resource type unless its definition says otherwise
    pub const CRUD: [Action; 5] = [
        Action::List,
        Action::Show,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    /// Catalog name of the action, used as the endpoint suffix
    pub fn as_str(self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Show => "show",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Patch => "patch",
        }
    }

    /// Whether the caller-populated parameters are sent with this action
    pub fn requires_parameters(self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::Patch)
    }

    /// Whether this action targets an existing object by id
    pub fn requires_identifier(self) -> bool {
        matches!(self, Action::Update | Action::Patch)
    }

    /// Read-only actions are issued as GET requests
    pub fn is_read(self) -> bool {
        matches!(self, Action::List | Action::Show)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known action name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
