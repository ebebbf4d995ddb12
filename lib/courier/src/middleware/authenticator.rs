//! Authentication challenge middleware.
//!
//! When the server answers `401 Unauthorized`, the configured
//! [`Authenticator`] is asked for a follow-up request carrying credentials.
//! The follow-up is sent in place of the original; if the authenticator gives
//! up, or the attempt budget is spent, the 401 response is passed on and ends
//! up classified as an authentication failure.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service, ServiceExt};
use tracing::debug;

use crate::{Error, Request, Response, Result};

/// Follow-up requests allowed per call.
pub const MAX_AUTH_ATTEMPTS: usize = 3;

/// Answers `401` challenges.
///
/// # Example
///
/// ```ignore
/// use courier::middleware::Authenticator;
///
/// struct RefreshingAuthenticator { tokens: TokenStore }
///
/// impl Authenticator for RefreshingAuthenticator {
///     async fn authenticate(
///         &self,
///         request: &Request<Bytes>,
///         _response: &Response<Bytes>,
///     ) -> Option<Request<Bytes>> {
///         let token = self.tokens.refresh().await.ok()?;
///         let mut retry = request.clone();
///         retry.headers_mut().insert("Authorization".into(), format!("Bearer {token}"));
///         Some(retry)
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Return the request to send instead, or `None` to give up.
    fn authenticate(
        &self,
        request: &Request<Bytes>,
        response: &Response<Bytes>,
    ) -> impl Future<Output = Option<Request<Bytes>>> + Send;
}

/// Authenticator answering a challenge with a fixed bearer token.
///
/// It gives up when the rejected request already carried that token.
#[derive(Debug, Clone)]
pub struct BearerAuthenticator {
    token: Arc<str>,
}

impl BearerAuthenticator {
    /// Create an authenticator for the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }

    fn credentials(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl Authenticator for BearerAuthenticator {
    async fn authenticate(
        &self,
        request: &Request<Bytes>,
        _response: &Response<Bytes>,
    ) -> Option<Request<Bytes>> {
        let credentials = self.credentials();
        if request.header("Authorization") == Some(credentials.as_str()) {
            return None;
        }

        let mut retry = request.clone();
        retry
            .headers_mut()
            .retain(|name, _| !name.eq_ignore_ascii_case("Authorization"));
        retry
            .headers_mut()
            .insert("Authorization".to_string(), credentials);
        Some(retry)
    }
}

/// Layer that answers `401` challenges with an [`Authenticator`].
#[derive(Debug)]
pub struct AuthenticatorLayer<A> {
    authenticator: Arc<A>,
}

impl<A> Clone for AuthenticatorLayer<A> {
    fn clone(&self) -> Self {
        Self {
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<A: Authenticator> AuthenticatorLayer<A> {
    /// Create a new layer.
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
        }
    }
}

impl<S, A> Layer<S> for AuthenticatorLayer<A> {
    type Service = Authenticate<S, A>;

    fn layer(&self, inner: S) -> Self::Service {
        Authenticate {
            inner,
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

/// Service that answers `401` challenges.
#[derive(Debug)]
pub struct Authenticate<S, A> {
    inner: S,
    authenticator: Arc<A>,
}

impl<S: Clone, A> Clone for Authenticate<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<S, A> Service<Request<Bytes>> for Authenticate<S, A>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
    A: Authenticator,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let mut inner = self.inner.clone();
        let authenticator = Arc::clone(&self.authenticator);

        Box::pin(async move {
            let mut request = request;
            let mut attempts = 0;
            loop {
                let response = inner.ready().await?.call(request.clone()).await?;
                if !response.is_unauthorized() || attempts == MAX_AUTH_ATTEMPTS {
                    return Ok(response);
                }

                attempts += 1;
                match authenticator.authenticate(&request, &response).await {
                    Some(follow_up) => {
                        debug!(attempts, url = %follow_up.url(), "answering auth challenge");
                        request = follow_up;
                    }
                    None => return Ok(response),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use courier_core::Method;

    use super::*;

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("https://api.example.com/me").expect("valid URL");
        Request::builder(Method::Get, url)
            .header("authorization", "Bearer stale")
            .build()
    }

    #[tokio::test]
    async fn bearer_authenticator_replaces_credentials() {
        let authenticator = BearerAuthenticator::new("fresh");
        let response = Response::new(401, HashMap::new(), Bytes::new());

        let retry = authenticator
            .authenticate(&request(), &response)
            .await
            .expect("follow-up request");

        assert_eq!(retry.header("Authorization"), Some("Bearer fresh"));
        assert_eq!(retry.headers().len(), 1);
    }

    #[tokio::test]
    async fn bearer_authenticator_gives_up_on_same_token() {
        let authenticator = BearerAuthenticator::new("stale");
        let response = Response::new(401, HashMap::new(), Bytes::new());

        assert!(authenticator.authenticate(&request(), &response).await.is_none());
    }
}
