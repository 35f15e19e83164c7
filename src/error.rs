//! Error types for catalog request building

use crate::resource::Action;
use thiserror::Error;

/// Result type alias using [`CrudError`]
pub type Result<T> = std::result::Result<T, CrudError>;

/// Errors raised while selecting actions, loading definitions, or
/// assembling request parameters.
///
/// Every variant is detected locally, before anything is handed to a
/// transport.
#[derive(Error, Debug)]
pub enum CrudError {
    #[error("action '{action}' is not supported by '{machine_name}'")]
    InvalidAction {
        machine_name: String,
        action: String,
    },

    #[error("no action selected for '{0}'")]
    PreconditionNotMet(String),

    #[error("missing required parameters for '{machine_name}': {}", missing.join(", "))]
    MissingParameters {
        machine_name: String,
        missing: Vec<String>,
    },

    #[error("action '{action}' on '{machine_name}' requires an id")]
    MissingIdentifier {
        machine_name: String,
        action: Action,
    },

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("invalid resource definition: {0}")]
    InvalidDefinition(String),

    #[error("unsupported definitions format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
