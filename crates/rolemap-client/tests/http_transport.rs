//! HttpTransport against a mock HTTP server.

use rolemap_client::{
    ApiKey, ClientError, CredentialScope, CredentialStore, EnvironmentCredentials, HttpTransport,
    RateLimitPolicy, Request, Transport, TransportConfig,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> CredentialStore {
    CredentialStore::new(Some(ApiKey::new("org-key", "org-secret")))
        .with_environment(
            "env-sr",
            EnvironmentCredentials {
                api_key: Some("cluster-key".to_string()),
                api_secret: Some("cluster-secret".to_string()),
                sr_api_key: Some("sr-key".to_string()),
                sr_api_secret: Some("sr-secret".to_string()),
            },
        )
        .with_environment(
            "env-plain",
            EnvironmentCredentials {
                api_key: Some("cluster-key".to_string()),
                api_secret: Some("cluster-secret".to_string()),
                ..Default::default()
            },
        )
}

fn fast_config(max_attempts: u32) -> TransportConfig {
    TransportConfig {
        timeout: Duration::from_secs(5),
        rate_limit: RateLimitPolicy::new(max_attempts, Duration::ZERO, Duration::from_secs(1)),
    }
}

fn transport(store: CredentialStore, max_attempts: u32) -> HttpTransport {
    HttpTransport::new(store, fast_config(max_attempts)).unwrap()
}

#[tokio::test]
async fn test_get_with_query_and_default_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cmk/v2/clusters"))
        .and(query_param("environment", "env-1"))
        .and(basic_auth("org-key", "org-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/cmk/v2/clusters", server.uri()),
        CredentialScope::Organization,
    )
    .query("environment", "env-1");

    let body = transport(credentials(), 3).request(&request).await;
    assert_eq!(body, Some(json!({"data": []})));
}

#[tokio::test]
async fn test_schema_registry_scope_uses_environment_sr_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(basic_auth("sr-key", "sr-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["orders-value"])))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/subjects", server.uri()),
        CredentialScope::SchemaRegistry("env-sr".into()),
    );

    let body = transport(credentials(), 3).request(&request).await;
    assert_eq!(body, Some(json!(["orders-value"])));
}

#[tokio::test]
async fn test_schema_registry_without_sr_credentials_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subjects"))
        .and(basic_auth("org-key", "org-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/subjects", server.uri()),
        CredentialScope::SchemaRegistry("env-plain".into()),
    );

    let body = transport(credentials(), 3).request(&request).await;
    assert_eq!(body, Some(json!([])));
}

#[tokio::test]
async fn test_cluster_scope_uses_environment_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kafka/v3/clusters/lkc-1/topics"))
        .and(basic_auth("cluster-key", "cluster-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/kafka/v3/clusters/lkc-1/topics", server.uri()),
        CredentialScope::Cluster("env-plain".into()),
    );

    assert!(transport(credentials(), 3).request(&request).await.is_some());
}

#[tokio::test]
async fn test_rate_limit_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/iam/v2/role-bindings"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iam/v2/role-bindings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "rb-1"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/iam/v2/role-bindings", server.uri()),
        CredentialScope::Organization,
    );

    let body = transport(credentials(), 3).request(&request).await;
    assert_eq!(body, Some(json!({"data": [{"id": "rb-1"}]})));
}

#[tokio::test]
async fn test_rate_limit_gives_up_after_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/org/v2/environments", server.uri()),
        CredentialScope::Organization,
    );
    let transport = transport(credentials(), 3);

    let err = transport.send(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::RateLimited { attempts: 3, .. }));
}

#[tokio::test]
async fn test_http_error_reads_as_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(2)
        .mount(&server)
        .await;

    let request = Request::get(
        format!("{}/org/v2/organizations", server.uri()),
        CredentialScope::Organization,
    );
    let transport = transport(credentials(), 3);

    assert!(transport.request(&request).await.is_none());
    match transport.send(&request).await.unwrap_err() {
        ClientError::Http { status, body, .. } => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_no_content_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = Request::get(server.uri(), CredentialScope::Organization);
    assert!(transport(credentials(), 3).send(&request).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let request = Request::get(server.uri(), CredentialScope::Organization);
    let err = transport(credentials(), 3).send(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_missing_credentials_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let request = Request::get(server.uri(), CredentialScope::Organization);
    let transport = transport(CredentialStore::new(None), 3);

    assert!(transport.request(&request).await.is_none());
    assert!(matches!(
        transport.send(&request).await.unwrap_err(),
        ClientError::MissingCredentials { .. }
    ));
}
