//! Transport trait.
//!
//! [`HttpClient`] is the seam between the request executor and whatever moves
//! bytes over the network. `courier` ships a hyper-based implementation;
//! tests usually plug in a mock.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
///
/// Implementations must be safe to share between concurrent calls. A single
/// instance is built once and reused for every request.
///
/// Dropping the returned future cancels the exchange; implementations must
/// release the underlying connection resources when that happens.
///
/// # Example
///
/// ```ignore
/// use courier_core::{HttpClient, Request, Response, Result};
/// use bytes::Bytes;
///
/// #[derive(Clone)]
/// struct Canned;
///
/// impl HttpClient for Canned {
///     async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
///         Ok(Response::new(200, Default::default(), Bytes::from_static(b"{}")))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Any status code is a successful exchange; only failures below the HTTP
    /// level are errors.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the exchange fails:
    /// - [`TransportKind::Timeout`](crate::TransportKind::Timeout) when a connect or read timeout elapses
    /// - [`TransportKind::NoConnectivity`](crate::TransportKind::NoConnectivity) for network and TLS failures
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
