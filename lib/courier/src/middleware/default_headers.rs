//! Default header middleware.
//!
//! Adds the configured default headers to every outgoing request that does
//! not already carry a header of the same name. Header names are compared
//! case-insensitively, so a request-supplied `accept` wins over a default
//! `Accept`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Layer that fills in default headers.
///
/// # Example
///
/// ```ignore
/// use courier::middleware::DefaultHeadersLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(DefaultHeadersLayer::new([("Accept".to_string(), "application/json".to_string())]))
///     .service(client);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultHeadersLayer {
    headers: Arc<[(String, String)]>,
}

impl DefaultHeadersLayer {
    /// Create a layer from name/value pairs.
    pub fn new(headers: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            headers: headers.into_iter().collect(),
        }
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeaders {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service that fills in default headers.
#[derive(Debug, Clone)]
pub struct DefaultHeaders<S> {
    inner: S,
    headers: Arc<[(String, String)]>,
}

impl<S> DefaultHeaders<S> {
    fn apply(&self, request: &mut Request<Bytes>) {
        for (name, value) in self.headers.iter() {
            if !request.has_header(name) {
                request.headers_mut().insert(name.clone(), value.clone());
            }
        }
    }
}

impl<S> Service<Request<Bytes>> for DefaultHeaders<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        self.apply(&mut request);

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Method;

    use super::*;

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("https://api.example.com").expect("valid URL");
        Request::builder(Method::Get, url)
            .header("accept", "text/plain")
            .build()
    }

    #[test]
    fn request_headers_win() {
        let service = DefaultHeadersLayer::new([
            ("Accept".to_string(), "application/json".to_string()),
            ("X-Client".to_string(), "courier".to_string()),
        ])
        .layer(());

        let mut request = request();
        service.apply(&mut request);

        assert_eq!(request.header("Accept"), Some("text/plain"));
        assert_eq!(request.header("x-client"), Some("courier"));
        assert_eq!(request.headers().len(), 2);
    }
}
