//! REST request execution for Rust.
//!
//! Describe a call with a [`RemoteRequest`], hand it to a [`RemoteService`]
//! and get back either a JSON [`Document`] or a typed [`Error`].
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! let service = RemoteService::new(
//!     ServiceConfig::builder()
//!         .base_url("https://api.example.com")
//!         .default_header("Accept", "application/json")
//!         .build(),
//! );
//!
//! let request = RemoteRequest::new(Method::Get, "/search").param("q", "rust");
//! match service.execute(request).await {
//!     Ok(document) => println!("{document}"),
//!     Err(err) if err.is_auth_failure() => println!("please log in again"),
//!     Err(err) => println!("{}", err.user_message().unwrap_or("request failed")),
//! }
//! ```
//!
//! Outside async code, [`RemoteService::execute_blocking`] runs the same call
//! to completion on the current thread.

mod cancel;
mod client;
mod config;
mod connector;
mod context;
pub mod middleware;
pub mod prelude;
mod service;

pub use cancel::CancelHandle;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use context::{AsyncRuntimeGuard, ContextGuard, ReservedThread, Unrestricted};
pub use service::RemoteService;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    DefaultErrorFieldExtractor, Document, DynamicValue, Error, ErrorDescriptor,
    ErrorFieldExtractor, ErrorReportSink, FieldNames, HttpClient, JSON_CONTENT_TYPE, Method,
    NoopSink, Params, ProgrammingError, RemoteRequest, Request, RequestBuilder, Response,
    ResponseClassifier, Result, TracingSink, TransportKind, normalize, normalize_params,
    parse_error_body,
};

// Re-export http types for status codes and headers
pub use courier_core::{StatusCode, header};
