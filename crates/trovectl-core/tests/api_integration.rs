//! Integration tests for the v1 managers against a mock Trove server

use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use trovectl_core::{
    ApiError, CacheType, CompletionCache, ReqwestClient, TroveClient, find_resource,
};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT_PATH: &str = "/v1.0/tenant";
const UUID_A: &str = "11111111-2222-3333-4444-555555555555";
const UUID_B: &str = "66666666-7777-8888-9999-000000000000";

async fn client(server: &MockServer, cache: CompletionCache) -> TroveClient {
    let http = ReqwestClient::builder(format!("{}{}", server.uri(), TENANT_PATH))
        .token("secret")
        .build()
        .unwrap();
    TroveClient::new(Arc::new(http), cache)
}

fn api_path(suffix: &str) -> String {
    format!("{}{}", TENANT_PATH, suffix)
}

fn instance(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "ACTIVE",
        "flavor": {"id": "1"},
        "volume": {"size": 2}
    })
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_auth_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/flavors")))
        .and(header("X-Auth-Token", "secret"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{"id": 1, "name": "m1.tiny", "ram": 512}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;
    let flavors = client.flavors.list().await.unwrap();

    assert_eq!(flavors.len(), 1);
    assert_eq!(flavors[0].id(), Some("1"));
    assert_eq!(flavors[0].to_string(), "<Flavor: m1.tiny>");
}

#[tokio::test]
async fn test_json_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path(&format!("/instances/{}/databases", UUID_A))))
        .and(body_json(json!({"databases": [{"name": "orders"}, {"name": "billing"}]})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;
    client
        .databases
        .create(UUID_A, &["orders", "billing"])
        .await
        .unwrap();
}

// ============================================================================
// Error translation
// ============================================================================

#[tokio::test]
async fn test_error_statuses_are_translated() {
    let server = MockServer::start().await;
    let cases = [
        (
            "/instances/missing",
            404,
            json!({"itemNotFound": {"code": 404, "message": "Instance missing could not be found."}}),
        ),
        (
            "/instances/busy",
            413,
            json!({"overLimit": {"code": 413, "message": "Too many requests."}}),
        ),
        ("/instances/broken", 500, json!({"message": "boom"})),
        ("/instances/teapot", 418, json!({"message": "short and stout"})),
    ];
    for (suffix, status, body) in &cases {
        Mock::given(method("GET"))
            .and(path(api_path(suffix)))
            .respond_with(ResponseTemplate::new(*status).set_body_json(body.clone()))
            .mount(&server)
            .await;
    }

    let client = client(&server, CompletionCache::disabled()).await;

    let err = client.instances.get("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Instance missing could not be found."));

    let err = client.instances.get("busy").await.unwrap_err();
    assert!(matches!(err, ApiError::OverLimit { status: 413, .. }));

    let err = client.instances.get("broken").await.unwrap_err();
    assert!(err.is_server_error());
    assert_eq!(err.status_code(), Some(500));

    let err = client.instances.get("teapot").await.unwrap_err();
    assert!(matches!(err, ApiError::Client { status: 418, .. }));
    assert!(err.to_string().contains("short and stout"));
}

#[tokio::test]
async fn test_non_json_error_body_keeps_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/backups/b1")))
        .respond_with(ResponseTemplate::new(409).set_body_string("backup is in use"))
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;
    let err = client.backups.delete("b1").await.unwrap_err();

    assert_eq!(err.status_code(), Some(409));
    assert!(err.to_string().contains("backup is in use"));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_list_follows_next_marker() {
    let server = MockServer::start().await;
    let next_href = format!("{}{}?marker={}", server.uri(), api_path("/instances"), UUID_A);

    Mock::given(method("GET"))
        .and(path(api_path("/instances")))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [instance(UUID_A, "alpha")],
            "links": [{"rel": "next", "href": next_href}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/instances")))
        .and(query_param("marker", UUID_A))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [instance(UUID_B, "beta")],
            "links": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;

    let page = client.instances.list(None, None).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page.next.as_deref(), Some(UUID_A));

    let all = client.instances.list_all().await.unwrap();
    let names: Vec<_> = all.iter().filter_map(|i| i.str_attr("name")).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_limit_and_marker_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/backups")))
        .and(query_param("limit", "5"))
        .and(query_param("marker", "b9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"backups": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;
    let page = client.backups.list(Some(5), Some("b9")).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(page.next, None);
}

// ============================================================================
// Finder
// ============================================================================

#[tokio::test]
async fn test_find_numeric_name_falls_back_to_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/instances/9876")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"code": 404, "message": "not found"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/instances")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [instance(UUID_A, "9876"), instance(UUID_B, "other")]
        })))
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;
    let found = find_resource(&client.instances, "9876").await.unwrap();

    assert_eq!(found.id(), Some(UUID_A));
}

#[tokio::test]
async fn test_find_by_uuid_and_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path(&format!("/instances/{}", UUID_B))))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"instance": instance(UUID_B, "beta")})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/instances")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [instance(UUID_A, "alpha"), instance(UUID_B, "beta")]
        })))
        .mount(&server)
        .await;

    let client = client(&server, CompletionCache::disabled()).await;

    let by_uuid = find_resource(&client.instances, UUID_B).await.unwrap();
    assert!(by_uuid.is_loaded());
    assert_eq!(by_uuid.str_attr("name"), Some("beta"));

    let by_prefix = find_resource(&client.instances, "1111").await.unwrap();
    assert_eq!(by_prefix.id(), Some(UUID_A));

    let err = find_resource(&client.instances, "nope").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "No instance with a name or ID of 'nope' exists."
    );
}

// ============================================================================
// Completion cache
// ============================================================================

#[tokio::test]
async fn test_listing_rewrites_completion_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/instances")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [instance(UUID_A, "alpha"), instance(UUID_B, "beta")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("/instances")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instance": instance("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee", "gamma")
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let cache = CompletionCache::at(dir.path());
    let client = client(&server, cache.clone()).await;

    client.instances.list(None, None).await.unwrap();
    assert_eq!(cache.read("instance", CacheType::Uuid), vec![UUID_A, UUID_B]);
    assert_eq!(
        cache.read("instance", CacheType::HumanId),
        vec!["alpha", "beta"]
    );

    let params = trovectl_core::v1::NewInstance::new("gamma", "1");
    client.instances.create(&params).await.unwrap();
    assert_eq!(
        cache.read("instance", CacheType::HumanId),
        vec!["alpha", "beta", "gamma"]
    );

    // A fresh listing replaces what creation appended
    client.instances.list(None, None).await.unwrap();
    assert_eq!(
        cache.read("instance", CacheType::HumanId),
        vec!["alpha", "beta"]
    );
}
