//! Transport seam
//!
//! The crate never talks to the network itself. Callers plug in whatever
//! client they use by implementing [`Transport`], and
//! [`CrudResource::dispatch`](crate::resource::CrudResource::dispatch) only
//! reaches it with a request that passed validation.

use super::request::ActionRequest;
use crate::error::CrudError;
use thiserror::Error;

/// Sends validated catalog requests
pub trait Transport {
    type Output;
    type Error;

    fn send(&self, request: &ActionRequest) -> Result<Self::Output, Self::Error>;
}

/// Failure of a dispatched call
#[derive(Error, Debug)]
pub enum DispatchError<E> {
    /// The resource was not in a valid state; nothing was sent
    #[error(transparent)]
    Crud(#[from] CrudError),

    #[error("transport error: {0}")]
    Transport(E),
}

impl<E> DispatchError<E> {
    /// Whether the failure happened before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, DispatchError::Crud(_))
    }
}
