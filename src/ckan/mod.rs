//! Catalog API boundary
//!
//! Types exchanged with the transport that actually performs catalog calls.
//!
//! # Module Structure
//!
//! - [`request`] - Validated action requests and their HTTP mapping
//! - [`transport`] - The trait a network client implements
//!
//! # Example
//!
//! ```
//! use ckan_connect::ckan::Method;
//! use ckan_connect::resource::{Action, CrudResource, ResourceDef};
//!
//! let def = ResourceDef::new("package");
//! let mut dataset = CrudResource::new(&def, "abc-123");
//! dataset.set_action(Action::Show)?;
//!
//! let request = dataset.request()?;
//! assert_eq!(request.method(), Method::Get);
//! assert_eq!(
//!     request.endpoint("https://demo.ckan.org")?.as_str(),
//!     "https://demo.ckan.org/api/3/action/package_show?id=abc-123"
//! );
//! # Ok::<(), ckan_connect::CrudError>(())
//! ```

pub mod request;
pub mod transport;

pub use request::{ActionRequest, Method};
pub use transport::{DispatchError, Transport};
