//! Description of one logical remote call.
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, RemoteRequest};
//!
//! let request = RemoteRequest::new(Method::Post, "/items")
//!     .param("name", "x")
//!     .param("tags", vec![Some("a"), None, Some("b")])
//!     .header("X-Trace", "1");
//!
//! assert_eq!(request.method(), Method::Post);
//! assert_eq!(request.relative_path(), "/items");
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{
    DynamicValue, Method, Params, Request, Result, normalize_params, to_query_pairs,
};

/// Method, target, parameters and headers of a call.
///
/// When no base URL is set, the executor uses the one from its configuration.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    method: Method,
    base_url: Option<String>,
    relative_path: String,
    params: Params,
    headers: HashMap<String, String>,
}

impl RemoteRequest {
    /// Creates a call against the configured base URL.
    #[must_use]
    pub fn new(method: Method, relative_path: impl Into<String>) -> Self {
        Self {
            method,
            base_url: None,
            relative_path: relative_path.into(),
            params: Params::new(),
            headers: HashMap::new(),
        }
    }

    /// Overrides the base URL for this call.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<DynamicValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Replaces all parameters.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets a header, replacing any header of the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path appended to the base URL.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Parameters.
    #[must_use]
    pub fn parameters(&self) -> &Params {
        &self.params
    }

    /// Build the transport request.
    ///
    /// The URL is `base_url + relative_path`, with the override taking
    /// precedence over `default_base_url`. GET and DELETE send the parameters
    /// as query pairs; PUT, POST and PATCH send them as a normalized JSON body.
    ///
    /// # Errors
    ///
    /// Returns a programming error if the URL does not parse.
    pub fn into_request(self, default_base_url: &str) -> Result<Request<Bytes>> {
        let base_url = self.base_url.as_deref().unwrap_or(default_base_url);
        let url = url::Url::parse(&format!("{base_url}{}", self.relative_path))?;

        let builder = Request::builder(self.method, url).headers(self.headers);
        let builder = if self.method.has_body() {
            builder.json(&normalize_params(self.params))?
        } else {
            builder.query_pairs(to_query_pairs(&self.params))
        };

        Ok(builder.build())
    }
}
