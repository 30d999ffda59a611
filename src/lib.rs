//! `apix` is a blocking HTTP API client pipeline with staged interception.
//!
//! Every call runs through four observer stages: before the request is
//! sent, on transport failure, after a response arrives and on a classified
//! error response. Observers can replace call options, stand in a response
//! for a failed transport call, substitute a result, replace the raised
//! error or repeat the original request.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use apix::prelude::{Options, Pipeline, UreqTransport};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = UreqTransport::builder("https://api.example.com/rest/v1")
//!         .client_name("wallet-sdk")
//!         .request_timeout(Duration::from_secs(5))
//!         .try_build()?;
//!
//!     let mut pipeline = Pipeline::builder(transport).max_repeats(2).build();
//!     pipeline.dispatcher_mut().on_before_request(|event| {
//!         event
//!             .request_mut()
//!             .headers_mut()
//!             .insert("authorization", "Bearer token".parse()?);
//!         Ok(())
//!     });
//!
//!     let wallet = pipeline.get("/wallet/14", Options::new())?;
//!     println!("wallet={wallet:?}");
//!     Ok(())
//! }
//! ```

mod decode;
mod dispatcher;
mod error;
mod event;
mod options;
mod pipeline;
mod request;
mod response;
mod transport;
mod util;

pub use crate::decode::Decoded;
pub use crate::dispatcher::{Dispatcher, Handler, Listener, ObserverResult, Subscriber};
pub use crate::error::{
    ApiError, ApiErrorKind, BoxError, Error, ErrorCode, TransportError, TransportErrorKind,
};
pub use crate::event::{
    HttpExceptionDecision, HttpExceptionEvent, RequestEvent, ResponseEvent,
    ResponseExceptionDecision, ResponseExceptionEvent, Stage,
};
pub use crate::options::Options;
pub use crate::pipeline::{DEFAULT_MAX_REPEATS, Pipeline, PipelineBuilder};
pub use crate::request::Request;
pub use crate::response::Response;
pub use crate::transport::Transport;
#[cfg(feature = "ureq-transport")]
pub use crate::transport::{UreqTransport, UreqTransportBuilder};

pub type ApixResult<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{
        ApiError, ApiErrorKind, ApixResult, Decoded, Dispatcher, Error, ErrorCode,
        HttpExceptionEvent, Listener, ObserverResult, Options, Pipeline, Request, RequestEvent,
        Response, ResponseEvent, ResponseExceptionEvent, Stage, Subscriber, Transport,
        TransportError, TransportErrorKind,
    };
    #[cfg(feature = "ureq-transport")]
    pub use crate::{UreqTransport, UreqTransportBuilder};
}

#[cfg(test)]
mod tests;
