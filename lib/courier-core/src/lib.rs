//! Core types and algorithms for courier.
//!
//! This crate holds everything that does not depend on a concrete transport:
//! - [`Method`] - the five supported HTTP verbs
//! - [`DynamicValue`] and [`Params`] - untyped request parameters
//! - [`normalize`] and [`normalize_params`] - conversion to canonical JSON
//! - [`parse_error_body`] and [`ErrorFieldExtractor`] - error body decoding
//! - [`ResponseClassifier`] and [`ErrorReportSink`] - status code mapping
//! - [`Error`] and [`Result`] - the failure taxonomy
//! - [`RemoteRequest`], [`Request`] and [`Response`] - call and wire types
//! - [`HttpClient`] - the transport trait

mod body;
mod classify;
mod client;
mod error;
mod error_body;
mod method;
mod normalize;
pub mod prelude;
mod remote;
mod request;
mod response;
mod value;

pub use body::{JSON_CONTENT_TYPE, to_json, to_query_pairs};
pub use classify::{ErrorReportSink, NoopSink, ResponseClassifier, TracingSink};
pub use client::HttpClient;
pub use error::{Error, ProgrammingError, Result, TransportKind};
pub use error_body::{
    DefaultErrorFieldExtractor, ErrorDescriptor, ErrorFieldExtractor, FieldNames,
    parse_error_body, text_field,
};
pub use method::Method;
pub use normalize::{Document, normalize, normalize_params};
pub use remote::RemoteRequest;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use value::{DynamicValue, Params};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
