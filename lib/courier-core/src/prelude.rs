//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    Document, DynamicValue, Error, ErrorFieldExtractor, ErrorReportSink, HttpClient, Method,
    Params, RemoteRequest, Request, Response, ResponseClassifier, Result, TransportKind,
    normalize, normalize_params,
};
