//! Response classification.
//!
//! [`ResponseClassifier`] turns a completed HTTP exchange into either the JSON
//! document of a successful response or exactly one typed [`Error`]. The rules
//! are checked in this order:
//!
//! | Status | Outcome |
//! |---|---|
//! | 200-299 | `Ok(document)`, `{}` for an empty body |
//! | 401, 403 | [`Error::AuthFailure`] |
//! | 400-599 | [`Error::Remote`] |
//! | anything else | [`Error::Transport`] with [`TransportKind::UnexpectedResponse`](crate::TransportKind::UnexpectedResponse) |
//!
//! Each failing status is handed to the configured [`ErrorReportSink`] once,
//! before the error is returned.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::{
    DefaultErrorFieldExtractor, Document, Error, ErrorFieldExtractor, Response, Result,
    parse_error_body,
};

// ============================================================================
// Error Report Sink
// ============================================================================

/// Side channel notified of every classified failure.
///
/// The sink is for telemetry only: the error is still returned to the caller
/// afterwards.
pub trait ErrorReportSink: Send + Sync + 'static {
    /// Called once per failed classification with the request's relative path.
    fn report(&self, error: &Error, request_path: &str);
}

/// Sink that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ErrorReportSink for NoopSink {
    fn report(&self, _error: &Error, _request_path: &str) {}
}

/// Sink that logs failures as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorReportSink for TracingSink {
    fn report(&self, error: &Error, request_path: &str) {
        tracing::warn!(
            path = request_path,
            status = error.status(),
            error = %error,
            "remote call failed"
        );
    }
}

impl<S: ErrorReportSink> ErrorReportSink for Arc<S> {
    fn report(&self, error: &Error, request_path: &str) {
        (**self).report(error, request_path);
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Maps status code and body to an outcome.
///
/// The classifier keeps no state between calls and is cheap to clone.
#[derive(Clone)]
pub struct ResponseClassifier {
    extractor: Arc<dyn ErrorFieldExtractor>,
    sink: Arc<dyn ErrorReportSink>,
}

impl fmt::Debug for ResponseClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseClassifier").finish_non_exhaustive()
    }
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseClassifier {
    /// Classifier using [`DefaultErrorFieldExtractor`] and [`NoopSink`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractor: Arc::new(DefaultErrorFieldExtractor),
            sink: Arc::new(NoopSink),
        }
    }

    /// Replace the error field extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: impl ErrorFieldExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Replace the error report sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl ErrorReportSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Classify a buffered response.
    pub fn classify_response(
        &self,
        response: &Response<Bytes>,
        request_path: &str,
    ) -> Result<Document> {
        self.classify(
            response.status(),
            response.reason(),
            response.body(),
            request_path,
        )
    }

    /// Classify a status code, reason phrase and raw body.
    pub fn classify(
        &self,
        status: u16,
        reason: Option<&str>,
        body: &[u8],
        request_path: &str,
    ) -> Result<Document> {
        let error = match status {
            200..=299 => return success_document(status, body),
            401 | 403 => {
                let message = parse_error_body(body, self.extractor.as_ref())
                    .map(|descriptor| descriptor.user_message)
                    .or_else(|| reason.map(str::to_string))
                    .unwrap_or_default();
                Error::AuthFailure { status, message }
            }
            400..=599 => match parse_error_body(body, self.extractor.as_ref()) {
                Some(descriptor) => Error::Remote {
                    status,
                    message: descriptor.user_message,
                    code: Some(descriptor.code),
                    name: Some(descriptor.name),
                },
                None => Error::Remote {
                    status,
                    message: reason.unwrap_or_default().to_string(),
                    code: None,
                    name: None,
                },
            },
            _ => Error::unexpected_response(format!("unexpected response status {status}")),
        };

        self.sink.report(&error, request_path);
        Err(error)
    }
}

fn success_document(status: u16, body: &[u8]) -> Result<Document> {
    if body.trim_ascii().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body).map_err(|err| {
        Error::unexpected_response(format!("malformed JSON body in {status} response: {err}"))
    })
}
