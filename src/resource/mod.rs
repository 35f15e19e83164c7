//! Resource abstraction layer
//!
//! This module provides a data-driven approach to catalog resource types.
//! Instead of one type per catalog object, every resource type is a
//! [`ResourceDef`] loaded from a definitions file, and a single
//! [`CrudResource`] computes endpoint paths and parameter sets for any of them.
//!
//! # Architecture
//!
//! - [`action`] - The catalog action vocabulary
//! - [`registry`] - Loads and validates resource definitions from JSON or YAML
//! - [`crud`] - Path and parameter computation for one catalog object
//!
//! # Example
//!
//! ```
//! use ckan_connect::resource::{Action, CrudResource, ResourceDef};
//!
//! let def = ResourceDef::new("package").with_required("name", "dataset name");
//! let mut dataset = CrudResource::new(&def, "");
//! dataset.set_action(Action::Create)?;
//! dataset.set_parameter("name", "air-quality");
//!
//! assert_eq!(dataset.path()?, "package_create");
//! assert_eq!(dataset.parameters()?["name"], "air-quality");
//! # Ok::<(), ckan_connect::CrudError>(())
//! ```

pub mod action;
pub mod crud;
pub mod registry;

pub use action::{Action, UnknownAction};
pub use crud::{CrudResource, Parameters};
pub use registry::{Registry, ResourceDef};
