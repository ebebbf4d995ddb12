//! Request/response logging middleware.
//!
//! Emits one `tracing` event when a request leaves and one when its response
//! (or transport failure) comes back. Enabled by
//! [`ServiceConfig::logging_enabled`](crate::ServiceConfig::logging_enabled).

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, Request, Response, Result};

/// Headers whose values are never logged.
const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", "proxy-authorization"];

/// How much of each exchange is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Request line, status and elapsed time.
    #[default]
    Basic,
    /// Basic plus request headers, with credentials redacted.
    Headers,
}

/// Layer that logs requests and responses.
///
/// # Example
///
/// ```ignore
/// use courier::middleware::LoggingLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(LoggingLayer::new())
///     .service(client);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// Log request lines and statuses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log request headers.
    #[must_use]
    pub fn headers() -> Self {
        Self {
            level: LogLevel::Headers,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

fn loggable_headers(request: &Request<Bytes>) -> Vec<(String, String)> {
    let mut headers: Vec<_> = request
        .headers()
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS
                .iter()
                .any(|redacted| name.eq_ignore_ascii_case(redacted))
            {
                "<redacted>".to_string()
            } else {
                value.clone()
            };
            (name.clone(), shown)
        })
        .collect();
    headers.sort();
    headers
}

impl<S> Service<Request<Bytes>> for Logging<S>
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

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let body_bytes = request.body().map_or(0, Bytes::len);

        let span = span!(Level::INFO, "remote_request", %method, %url);

        if self.level == LogLevel::Headers {
            let headers = loggable_headers(&request);
            span.in_scope(|| debug!(?headers, body_bytes, "--> request"));
        } else {
            span.in_scope(|| info!(body_bytes, "--> request"));
        }

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        let body_bytes = response.body().len();
                        info!(status, elapsed_ms, body_bytes, "<-- response");
                    }
                    Err(err) => warn!(error = %err, elapsed_ms, "<-- failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Method;

    use super::*;

    #[test]
    fn logging_layer_default() {
        assert_eq!(LoggingLayer::new().level, LogLevel::Basic);
        assert_eq!(LoggingLayer::headers().level, LogLevel::Headers);
    }

    #[test]
    fn credentials_are_redacted() {
        let url = url::Url::parse("https://api.example.com").expect("valid URL");
        let request = Request::<Bytes>::builder(Method::Get, url)
            .header("Authorization", "Bearer secret")
            .header("Accept", "application/json")
            .build();

        assert_eq!(
            loggable_headers(&request),
            [
                ("Accept".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "<redacted>".to_string()),
            ]
        );
    }
}
