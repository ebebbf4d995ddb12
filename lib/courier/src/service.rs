//! Request execution.
//!
//! [`RemoteService`] turns a [`RemoteRequest`] into a [`Document`] or a typed
//! [`Error`]: it builds the URL, encodes parameters, sends the request through
//! the transport and classifies the response.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::thread;

use courier_core::{
    Document, Error, ErrorFieldExtractor, ErrorReportSink, HttpClient, ProgrammingError,
    RemoteRequest, ResponseClassifier, Result,
};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::{AsyncRuntimeGuard, CancelHandle, ContextGuard, HyperClient, ServiceConfig};

/// Worker threads of the runtime driving blocking calls.
const BLOCKING_WORKER_THREADS: usize = 2;

/// Private runtime driving blocking calls.
///
/// Shut down in the background on drop, which is allowed from any context.
struct BlockingRuntime {
    runtime: Option<Runtime>,
}

impl BlockingRuntime {
    fn build() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(BLOCKING_WORKER_THREADS)
            .thread_name("courier-blocking")
            .enable_all()
            .build()
            .map_err(|e| ProgrammingError::BlockingUnavailable(e.to_string()))?;

        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Drive `future` to completion, parking the calling thread.
    ///
    /// Runtimes cannot nest, so a caller that is itself inside a runtime
    /// context waits on a helper thread that owns the `block_on`.
    fn block_on<F>(&self, future: F) -> Result<F::Output>
    where
        F: Future + Send,
        F::Output: Send,
    {
        let runtime = self.runtime.as_ref().ok_or_else(|| {
            ProgrammingError::BlockingUnavailable("runtime shut down".to_string())
        })?;

        if tokio::runtime::Handle::try_current().is_err() {
            return Ok(runtime.block_on(future));
        }

        let output = thread::scope(|scope| {
            scope
                .spawn(|| runtime.block_on(future))
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        });
        Ok(output)
    }
}

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Executes remote requests against one configured service.
///
/// Cloning is cheap: clones share the transport, configuration, classifier
/// and blocking runtime.
///
/// # Example
///
/// ```ignore
/// use courier::{Method, RemoteRequest, RemoteService, ServiceConfig};
///
/// let service = RemoteService::new(
///     ServiceConfig::builder().base_url("https://api.example.com").build(),
/// );
///
/// let created = service
///     .execute(
///         RemoteRequest::new(Method::Post, "/items")
///             .param("name", "x")
///             .param("tags", vec!["a", "b"]),
///     )
///     .await?;
/// assert_eq!(created["id"], 42);
/// ```
pub struct RemoteService<C = HyperClient> {
    client: C,
    config: Arc<ServiceConfig>,
    classifier: ResponseClassifier,
    guard: Arc<dyn ContextGuard>,
    blocking: Arc<OnceLock<BlockingRuntime>>,
}

impl<C: Clone> Clone for RemoteService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
            classifier: self.classifier.clone(),
            guard: Arc::clone(&self.guard),
            blocking: Arc::clone(&self.blocking),
        }
    }
}

impl<C> fmt::Debug for RemoteService<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteService")
            .field("config", &self.config)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl RemoteService<HyperClient> {
    /// Create a service with a hyper transport built from `config`.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let client = HyperClient::from_config(&config);
        Self::with_client(client, config)
    }
}

impl<C: HttpClient> RemoteService<C> {
    /// Create a service over an existing transport.
    ///
    /// The transport is used as is; `config` only supplies the base URL.
    #[must_use]
    pub fn with_client(client: C, config: ServiceConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
            classifier: ResponseClassifier::new(),
            guard: Arc::new(AsyncRuntimeGuard),
            blocking: Arc::new(OnceLock::new()),
        }
    }

    /// Read error descriptor fields with this extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: impl ErrorFieldExtractor) -> Self {
        self.classifier = self.classifier.with_extractor(extractor);
        self
    }

    /// Report classified failures to this sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl ErrorReportSink) -> Self {
        self.classifier = self.classifier.with_sink(sink);
        self
    }

    /// Decide which threads may use the blocking strategy.
    #[must_use]
    pub fn with_guard(mut self, guard: impl ContextGuard) -> Self {
        self.guard = Arc::new(guard);
        self
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Execute a request.
    ///
    /// # Errors
    ///
    /// - [`Error::Programming`] if the URL or body cannot be built
    /// - [`Error::Transport`] if the exchange fails or a success body is not JSON
    /// - [`Error::AuthFailure`] for `401` and `403`
    /// - [`Error::Remote`] for other `4xx` and `5xx` statuses
    pub async fn execute(&self, request: RemoteRequest) -> Result<Document> {
        let method = request.method();
        let path = request.relative_path().to_string();
        let request = request.into_request(&self.config.base_url)?;

        debug!(%method, url = %request.url(), "dispatching remote request");
        let response = self.client.execute(request).await?;

        self.classifier.classify_response(&response, &path)
    }

    /// Execute a request unless `cancel` fires first.
    ///
    /// When the handle fires, the in-flight exchange is dropped before this
    /// returns.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus a
    /// [`TransportKind::Cancelled`](courier_core::TransportKind::Cancelled) transport error on
    /// cancellation.
    pub async fn execute_cancellable(
        &self,
        request: RemoteRequest,
        cancel: &CancelHandle,
    ) -> Result<Document> {
        if cancel.is_cancelled() {
            return Err(Error::cancelled());
        }

        let path = request.relative_path().to_string();
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(path = %path, "remote request cancelled");
                Err(Error::cancelled())
            }
            outcome = self.execute(request) => outcome,
        }
    }

    /// Execute a request, blocking the current thread until it completes.
    ///
    /// Produces the same outcome as [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// [`ProgrammingError::WrongContext`] if the context guard reserves the
    /// current thread; nothing is sent in that case.
    /// [`ProgrammingError::BlockingUnavailable`] if the blocking runtime cannot
    /// be started. Otherwise as [`execute`](Self::execute).
    pub fn execute_blocking(&self, request: RemoteRequest) -> Result<Document> {
        self.ensure_may_block()?;
        self.blocking_runtime()?.block_on(self.execute(request))?
    }

    /// Blocking form of [`execute_cancellable`](Self::execute_cancellable).
    ///
    /// # Errors
    ///
    /// As [`execute_blocking`](Self::execute_blocking), plus a
    /// [`TransportKind::Cancelled`](courier_core::TransportKind::Cancelled) transport error on
    /// cancellation.
    pub fn execute_blocking_cancellable(
        &self,
        request: RemoteRequest,
        cancel: &CancelHandle,
    ) -> Result<Document> {
        self.ensure_may_block()?;
        self.blocking_runtime()?
            .block_on(self.execute_cancellable(request, cancel))?
    }

    fn ensure_may_block(&self) -> Result<()> {
        if self.guard.is_reserved() {
            debug!("refusing blocking call on reserved thread");
            return Err(ProgrammingError::WrongContext.into());
        }
        Ok(())
    }

    fn blocking_runtime(&self) -> Result<&BlockingRuntime> {
        if let Some(runtime) = self.blocking.get() {
            return Ok(runtime);
        }

        let runtime = BlockingRuntime::build()?;
        // A racing thread may have won; the spare runtime is dropped.
        let _ = self.blocking.set(runtime);
        let runtime = self.blocking.get().ok_or_else(|| {
            ProgrammingError::BlockingUnavailable("runtime not initialised".to_string())
        })?;
        Ok(runtime)
    }
}
