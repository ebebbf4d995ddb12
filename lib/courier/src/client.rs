//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::{Layer, ServiceExt};
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{
    Error, Request, Response, Result, ServiceConfig,
    connector::https_connector,
    middleware::{Authenticator, AuthenticatorLayer, DefaultHeadersLayer, LoggingLayer},
};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased service for middleware composition.
pub type BoxedService = BoxCloneService<Request<Bytes>, Response<Bytes>, Error>;

/// Future type for Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// Thread-safe wrapper for `BoxedService`.
///
/// `BoxCloneService` is not `Sync`; every call clones it out of the mutex so
/// the lock is never held across an await.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request<Bytes>) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.ready().await?.call(request).await })
    }
}

// ============================================================================
// Raw Client
// ============================================================================

/// Pooled hyper client, the innermost service of every stack.
#[derive(Clone)]
struct RawHyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: Arc<ServiceConfig>,
}

impl RawHyperClient {
    fn new(config: Arc<ServiceConfig>) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let hyper_request = Self::build_hyper_request(request)?;
        let read_timeout = self.config.read_timeout;

        let exchange = async move {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let status = response.status().as_u16();
            let headers = Self::extract_headers(response.headers());

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::no_connectivity(format!("reading body: {e}")))?
                .to_bytes();

            Ok::<_, Error>(Response::new(status, headers, body))
        };

        tokio::time::timeout(read_timeout, exchange)
            .await
            .map_err(|_| Error::timeout(format!("no response within {read_timeout:?}")))?
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let timed_out = std::iter::successors(err.source(), |e| (*e).source()).any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::TimedOut)
        });

        if timed_out {
            return Error::timeout(err.to_string());
        }

        let detail = std::iter::successors(err.source(), |e| (*e).source())
            .last()
            .map_or_else(|| err.to_string(), |cause| format!("{err}: {cause}"));
        Error::no_connectivity(detail)
    }
}

impl Service<Request<Bytes>> for RawHyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

// ============================================================================
// Public Client
// ============================================================================

/// Shared HTTP transport: pooled connections, rustls TLS, middleware stack.
///
/// Cloning is cheap and every clone shares the same connection pool, so a
/// single instance serves all calls.
///
/// # Example
///
/// ```ignore
/// use courier::{HyperClient, ServiceConfig};
///
/// let config = ServiceConfig::builder()
///     .base_url("https://api.example.com")
///     .logging_enabled(true)
///     .build();
/// let client = HyperClient::from_config(&config);
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: SyncService,
    config: Arc<ServiceConfig>,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client honouring timeouts, default headers and logging of a
    /// service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::builder().config(config.clone()).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl courier_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.call(request).await
    }
}

type LayerFn = Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`HyperClient`].
///
/// The stack, from the network outwards, is: logging, authenticator, default
/// headers, then custom layers in the order they were added.
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ServiceConfig,
    authenticator: Option<LayerFn>,
    layers: Vec<LayerFn>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator.is_some())
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Use the timeouts, pool settings, default headers and logging flag of
    /// this configuration.
    #[must_use]
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(name.into(), value.into());
        self
    }

    /// Enable or disable request logging.
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.config.logging_enabled = enabled;
        self
    }

    /// Answer `401` challenges with this authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: impl Authenticator) -> Self {
        let layer = AuthenticatorLayer::new(authenticator);
        self.authenticator = Some(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add a Tower layer around the configured stack.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Build the client with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let config = Arc::new(self.config);
        let mut service: BoxedService =
            BoxCloneService::new(RawHyperClient::new(Arc::clone(&config)));

        if config.logging_enabled {
            service = BoxCloneService::new(LoggingLayer::new().layer(service));
        }

        if let Some(authenticator) = self.authenticator {
            service = authenticator(service);
        }

        if !config.default_headers.is_empty() {
            let defaults = DefaultHeadersLayer::new(
                config
                    .default_headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
            service = BoxCloneService::new(defaults.layer(service));
        }

        for layer_fn in self.layers {
            service = layer_fn(service);
        }

        HyperClient {
            service: SyncService::new(service),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn client_default() {
        let client = HyperClient::new();
        assert_eq!(client.config().read_timeout, Duration::from_secs(30));
        assert!(!client.config().logging_enabled);
    }

    #[test]
    fn client_from_config() {
        let config = ServiceConfig::builder()
            .read_timeout(Duration::from_secs(60))
            .default_header("Accept", "application/json")
            .logging_enabled(true)
            .build();
        let client = HyperClient::from_config(&config);

        assert_eq!(client.config().read_timeout, Duration::from_secs(60));
        assert!(client.config().logging_enabled);
        assert_eq!(client.config().default_headers.len(), 1);
    }

    #[test]
    fn builder_setters() {
        let client = HyperClient::builder()
            .connect_timeout(Duration::from_secs(2))
            .read_timeout(Duration::from_secs(3))
            .default_header("X-Client", "courier")
            .logging(true)
            .build();

        assert_eq!(client.config().connect_timeout, Duration::from_secs(2));
        assert_eq!(client.config().read_timeout, Duration::from_secs(3));
        assert!(client.config().logging_enabled);
    }

    #[test]
    fn client_is_debug() {
        let client = HyperClient::new();
        let debug = format!("{client:?}");
        assert!(debug.contains("HyperClient"));
    }
}
