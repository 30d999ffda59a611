use std::sync::Arc;

use crate::error::TransportError;
use crate::request::Request;
use crate::response::Response;

#[cfg(feature = "ureq-transport")]
mod agent;

#[cfg(feature = "ureq-transport")]
pub use agent::{UreqTransport, UreqTransportBuilder};

/// Performs the HTTP I/O for one request.
///
/// Implementations return any response the server sent, whatever its status,
/// and must not decode the body. An `Err` means no response was obtained.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).execute(request)
    }
}

impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).execute(request)
    }
}

impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).execute(request)
    }
}
