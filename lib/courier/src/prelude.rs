//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    CancelHandle, Document, DynamicValue, Error, HyperClient, Method, Params, RemoteRequest,
    RemoteService, Result, ServiceConfig, StatusCode, TransportKind,
};
pub use crate::middleware::{Authenticator, BearerAuthenticator};
