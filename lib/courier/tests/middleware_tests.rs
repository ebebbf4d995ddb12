//! Integration tests for middleware functionality.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assert2::{check, let_assert};
use bytes::Bytes;
use courier::middleware::{Authenticator, BearerAuthenticator, MAX_AUTH_ATTEMPTS};
use courier::{
    Error, HttpClient, HyperClient, Method, RemoteRequest, RemoteService, Request, Response,
    ServiceConfig,
};
use serde_json::json;
use tower::util::MapRequestLayer;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig::builder().base_url(server.uri()).build()
}

/// Authenticator that always retries and counts how often it was asked.
#[derive(Clone, Default)]
struct Persistent {
    asked: Arc<AtomicUsize>,
}

impl Authenticator for Persistent {
    async fn authenticate(
        &self,
        request: &Request<Bytes>,
        _response: &Response<Bytes>,
    ) -> Option<Request<Bytes>> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Some(request.clone())
    }
}

/// Test that a 401 is answered with bearer credentials and the retry succeeds.
#[tokio::test]
async fn test_authenticator_answers_challenge() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": "alice"})))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let client = HyperClient::builder()
        .config(config.clone())
        .with_authenticator(BearerAuthenticator::new("fresh"))
        .build();
    let service = RemoteService::with_client(client, config);

    let document = service
        .execute(RemoteRequest::new(Method::Get, "/me"))
        .await
        .expect("authenticated");

    check!(document == json!({"user": "alice"}));
}

/// Test that a rejected token ends as an authentication failure.
#[tokio::test]
async fn test_authenticator_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"userMessage": "Bad token"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let client = HyperClient::builder()
        .config(config.clone())
        .with_authenticator(BearerAuthenticator::new("revoked"))
        .build();
    let service = RemoteService::with_client(client, config);

    let error = service
        .execute(RemoteRequest::new(Method::Get, "/me"))
        .await
        .expect_err("auth failure");

    let_assert!(Error::AuthFailure { status: 401, message } = error);
    check!(message == "Bad token");
}

/// Test that follow-up requests are bounded.
#[tokio::test]
async fn test_authenticator_attempts_are_bounded() {
    let mock_server = MockServer::start().await;

    let attempts = u64::try_from(MAX_AUTH_ATTEMPTS).expect("small") + 1;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(attempts)
        .mount(&mock_server)
        .await;

    let authenticator = Persistent::default();
    let config = config_for(&mock_server);
    let client = HyperClient::builder()
        .config(config.clone())
        .with_authenticator(authenticator.clone())
        .build();
    let service = RemoteService::with_client(client, config);

    let error = service
        .execute(RemoteRequest::new(Method::Get, "/me"))
        .await
        .expect_err("auth failure");

    check!(error.is_auth_failure());
    check!(authenticator.asked.load(Ordering::SeqCst) == MAX_AUTH_ATTEMPTS);
}

/// Test that a custom tower layer sees every request.
#[tokio::test]
async fn test_custom_layer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/traced"))
        .and(header("X-Request-Id", "req-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(MapRequestLayer::new(|mut request: Request<Bytes>| {
            request
                .headers_mut()
                .insert("X-Request-Id".to_string(), "req-1".to_string());
            request
        }))
        .build();

    let url = url::Url::parse(&format!("{}/traced", mock_server.uri())).expect("url");
    let response = client
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    check!(response.status() == 204);
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("courier=debug")
        .with_test_writer()
        .try_init();

    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = RemoteService::new(
        ServiceConfig::builder()
            .base_url(mock_server.uri())
            .default_header("Authorization", "Bearer secret")
            .logging_enabled(true)
            .build(),
    );

    let document = service
        .execute(RemoteRequest::new(Method::Post, "/logged").param("a", 1))
        .await
        .expect("response");

    check!(document == json!({"logged": true}));
}
