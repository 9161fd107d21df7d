//! The transport boundary: something able to send a [`BuiltRequest`] and return a [`RawResponse`].
//!
//! Connection handling, TLS, timeouts and retries all belong to the transport.
//! Its errors are passed to the caller untouched, see [`SendError::Transport`](crate::SendError::Transport).

use std::error::Error;
use std::future::Future;

use crate::{BuiltRequest, RawResponse};

mod client;
pub use self::client::ReqwestTransportError;

/// A blocking transport.
///
/// Implemented for `reqwest::blocking::Client` with the `blocking` feature.
pub trait Transport {
    /// The transport error.
    type Error: Error + Send + Sync + 'static;

    /// Sends the request, blocking the current thread until the response is received.
    ///
    /// # Errors
    ///
    /// Any failure of the transport itself.
    fn send(&self, request: BuiltRequest) -> Result<RawResponse, Self::Error>;
}

/// A suspending transport.
///
/// Implemented for `reqwest::Client`. Dropping the returned future cancels the call,
/// as far as the transport supports it.
pub trait AsyncTransport: Send + Sync {
    /// The transport error.
    type Error: Error + Send + Sync + 'static;

    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Any failure of the transport itself.
    fn send(
        &self,
        request: BuiltRequest,
    ) -> impl Future<Output = Result<RawResponse, Self::Error>> + Send;
}
