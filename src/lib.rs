//! Typed request building for CKAN-style catalog action APIs.
//!
//! A catalog exposes every operation as a named action
//! (`package_show`, `organization_create`, ...). This crate maps CRUD
//! operations on a resource type onto those names and assembles the
//! parameter set each action expects, rejecting invalid combinations
//! before anything is sent.
//!
//! - [`resource`] - Resource definitions and path/parameter computation
//! - [`ckan`] - Requests handed to a caller-supplied transport
//! - [`config`] - Persisted user configuration for the CLI

pub mod ckan;
pub mod config;
pub mod error;
pub mod resource;

pub use ckan::{ActionRequest, DispatchError, Method, Transport};
pub use error::{CrudError, Result};
pub use resource::{Action, CrudResource, Parameters, Registry, ResourceDef};
