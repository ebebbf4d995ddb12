//! HTTP method types.

use std::str::FromStr;

use derive_more::Display;

use crate::{Error, ProgrammingError};

/// HTTP request method.
///
/// Only the five verbs a remote service call can use are representable, so an
/// unknown verb is rejected when the method is parsed and never reaches the
/// transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[display("GET")]
    Get,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
}

impl Method {
    /// Returns `true` if parameters travel in a JSON body rather than the query string.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Put | Self::Post | Self::Patch)
    }

    /// Returns `true` if the method is idempotent.
    #[must_use]
    pub const fn is_idempotent(&self) -> bool {
        matches!(self, Self::Get | Self::Put | Self::Delete)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Put => Self::PUT,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        match method {
            http::Method::GET => Ok(Self::Get),
            http::Method::PUT => Ok(Self::Put),
            http::Method::POST => Ok(Self::Post),
            http::Method::DELETE => Ok(Self::Delete),
            http::Method::PATCH => Ok(Self::Patch),
            other => Err(ProgrammingError::UnsupportedMethod(other.to_string()).into()),
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            _ => Err(ProgrammingError::UnsupportedMethod(s.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn method_has_body() {
        assert!(Method::Put.has_body());
        assert!(Method::Post.has_body());
        assert!(Method::Patch.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Delete.has_body());
    }

    #[test]
    fn method_is_idempotent() {
        assert!(Method::Get.is_idempotent());
        assert!(Method::Put.is_idempotent());
        assert!(Method::Delete.is_idempotent());
        assert!(!Method::Post.is_idempotent());
        assert!(!Method::Patch.is_idempotent());
    }

    #[test]
    fn method_from_str() {
        assert_eq!("get".parse::<Method>().expect("GET"), Method::Get);
        assert_eq!("PATCH".parse::<Method>().expect("PATCH"), Method::Patch);
    }

    #[test]
    fn unknown_method_is_a_programming_error() {
        let err = "TRACE".parse::<Method>().expect_err("TRACE is not supported");
        assert!(err.is_programming());
        assert_eq!(err.to_string(), "unsupported HTTP method: TRACE");

        let err = Method::try_from(http::Method::HEAD).expect_err("HEAD is not supported");
        assert!(err.is_programming());
    }

    #[test]
    fn method_into_http() {
        assert_eq!(http::Method::from(Method::Get), http::Method::GET);
        assert_eq!(http::Method::from(Method::Patch), http::Method::PATCH);
    }
}
