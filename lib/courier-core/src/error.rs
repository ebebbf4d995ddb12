//! Error types for courier.
//!
//! Every failed call ends in exactly one [`Error`] value. The variants form a
//! small taxonomy:
//!
//! - [`Error::Programming`] - misuse of the API (wrong calling context, unknown
//!   verb, malformed URL). Raised before any network I/O.
//! - [`Error::Transport`] - the exchange itself failed, see [`TransportKind`].
//! - [`Error::AuthFailure`] - the server answered 401 or 403.
//! - [`Error::Remote`] - the server answered with another 4xx/5xx status.

use derive_more::{Display, Error, From};

// ============================================================================
// Transport Kind
// ============================================================================

/// Sub-category of [`Error::Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TransportKind {
    /// Connect or read timeout elapsed.
    #[display("timeout")]
    Timeout,
    /// The remote host could not be reached or the connection broke.
    #[display("no connectivity")]
    NoConnectivity,
    /// The calling context cancelled the call while it was in flight.
    #[display("cancelled")]
    Cancelled,
    /// The server answered with a status (or body) outside every known range.
    #[display("unexpected response")]
    UnexpectedResponse,
}

// ============================================================================
// Programming Error
// ============================================================================

/// Misuse of the API, signalled before any request is sent.
#[derive(Debug, Display, Error, From)]
pub enum ProgrammingError {
    /// A blocking call was made from a thread that must not block.
    #[display("blocking execution is not allowed on this thread")]
    #[from(skip)]
    WrongContext,

    /// The HTTP verb is not one of GET, PUT, POST, DELETE or PATCH.
    #[display("unsupported HTTP method: {_0}")]
    #[from(skip)]
    UnsupportedMethod(#[error(not(source))] String),

    /// Base URL and relative path do not form a valid URL.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The request could not be assembled (header name, header value, body).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The private runtime behind blocking calls could not be started.
    #[display("blocking execution unavailable: {_0}")]
    #[from(skip)]
    BlockingUnavailable(#[error(not(source))] String),
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// API misuse, see [`ProgrammingError`].
    #[display("{_0}")]
    #[from]
    Programming(#[error(not(source))] ProgrammingError),

    /// The exchange failed below the HTTP status level.
    #[display("transport error ({kind}): {message}")]
    #[from(skip)]
    Transport {
        /// Failure category.
        kind: TransportKind,
        /// Human readable detail.
        message: String,
    },

    /// The server rejected the credentials (401 or 403).
    #[display("authentication failed ({status}): {message}")]
    #[from(skip)]
    AuthFailure {
        /// HTTP status code.
        status: u16,
        /// User-facing message from the error body, or the reason phrase.
        message: String,
    },

    /// The server answered with a 4xx or 5xx status.
    #[display("remote error {status}: {message}")]
    #[from(skip)]
    Remote {
        /// HTTP status code.
        status: u16,
        /// User-facing message from the error body, or the reason phrase.
        message: String,
        /// Machine-readable code, present when the error body was parsed.
        code: Option<String>,
        /// Symbolic error name, present when the error body was parsed.
        name: Option<String>,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Programming(ProgrammingError::InvalidUrl(err))
    }
}

impl Error {
    /// Create a transport error of the given kind.
    #[must_use]
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::transport(TransportKind::Timeout, message)
    }

    /// Create a connectivity error.
    #[must_use]
    pub fn no_connectivity(message: impl Into<String>) -> Self {
        Self::transport(TransportKind::NoConnectivity, message)
    }

    /// Create a cancellation error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::transport(TransportKind::Cancelled, "request cancelled")
    }

    /// Create an unexpected-response error.
    #[must_use]
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::transport(TransportKind::UnexpectedResponse, message)
    }

    /// Create an authentication failure.
    #[must_use]
    pub fn auth_failure(status: u16, message: impl Into<String>) -> Self {
        Self::AuthFailure {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Programming(ProgrammingError::InvalidRequest(message.into()))
    }

    /// Returns `true` for API misuse.
    #[must_use]
    pub const fn is_programming(&self) -> bool {
        matches!(self, Self::Programming(_))
    }

    /// Returns `true` if the call was made from a reserved context.
    #[must_use]
    pub const fn is_wrong_context(&self) -> bool {
        matches!(self, Self::Programming(ProgrammingError::WrongContext))
    }

    /// Returns the transport failure category, if any.
    #[must_use]
    pub const fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportKind::Timeout,
                ..
            }
        )
    }

    /// Returns `true` if this is a connectivity error.
    #[must_use]
    pub const fn is_no_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportKind::NoConnectivity,
                ..
            }
        )
    }

    /// Returns `true` if the call was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportKind::Cancelled,
                ..
            }
        )
    }

    /// Returns `true` if the server rejected the credentials.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }

    /// Returns the HTTP status code for auth and remote errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthFailure { status, .. } | Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the user-facing message for auth and remote errors.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::AuthFailure { message, .. } | Self::Remote { message, .. } => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }
}
