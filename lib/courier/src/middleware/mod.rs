//! Tower middleware layers for the courier transport.
//!
//! [`HyperClient::from_config`](crate::HyperClient::from_config) installs the
//! layers a [`ServiceConfig`](crate::ServiceConfig) asks for; the builder's
//! `.layer()` accepts any other Tower layer over courier's request and
//! response types.
//!
//! # Available Layers
//!
//! - [`DefaultHeadersLayer`] - Adds configured headers the request does not set
//! - [`AuthenticatorLayer`] - Answers `401` challenges with an [`Authenticator`]
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! # Example
//!
//! ```ignore
//! use courier::HyperClient;
//! use courier::middleware::{BearerAuthenticator, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .with_authenticator(BearerAuthenticator::new("my-token"))
//!     .layer(LoggingLayer::headers())
//!     .build();
//! ```

mod authenticator;
mod default_headers;
mod logging;

pub use authenticator::{
    Authenticate, Authenticator, AuthenticatorLayer, BearerAuthenticator, MAX_AUTH_ATTEMPTS,
};
pub use default_headers::{DefaultHeaders, DefaultHeadersLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
