use super::*;
use crate::Config;
use crate::store::memory::{MemoryAsset, MemoryAssetStore, MemoryContainerStore};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;


const PDF_ID: &str = "8d7e96d4-501a-4ade-93d5-a5956b13a5df";
const PDF_FILENAME: &str = "Download_Test_PDF.pdf";
const PDF_BYTES: &[u8] = b"%PDF-1.4 sample content";

/// Handles to the in-memory stores behind a test gateway, for assertions
/// on state the HTTP surface does not expose.
struct TestStores {
    assets: Arc<MemoryAssetStore>,
    containers: Arc<MemoryContainerStore>,
    pdf: Arc<MemoryAsset>,
}

/// Helper to create a test gateway with a known asset population
fn create_test_gateway(config: Config) -> (Arc<AssetGateway>, TestStores) {
    let assets = Arc::new(MemoryAssetStore::new());
    let pdf = assets.insert(MemoryAsset::new(
        PDF_ID,
        PDF_FILENAME,
        "application/pdf",
        PDF_BYTES.to_vec(),
    ));
    assets.insert(MemoryAsset::folder("folder-1", "documents"));
    assets.insert(MemoryAsset::without_original(
        "no-original",
        "ghost.pdf",
        "application/pdf",
    ));

    let containers = Arc::new(MemoryContainerStore::new());
    containers.insert_container(
        "/content/page/par",
        vec!["a".into(), "b".into(), "c".into()],
    );

    let gateway = Arc::new(AssetGateway::new(assets.clone(), containers.clone(), config));
    (
        gateway,
        TestStores {
            assets,
            containers,
            pdf,
        },
    )
}

/// Helper to create a ready-to-oneshot router over a test gateway
fn test_app(config: Config) -> (Router, TestStores) {
    let (gateway, stores) = create_test_gateway(config);
    let config = gateway.config();
    (create_router(gateway, config), stores)
}

#[tokio::test]
async fn test_api_server_spawns() {
    let mut config = Config::default();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let (gateway, _stores) = create_test_gateway(config);

    let api_handle = gateway.spawn_api_server();

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    api_handle.abort();
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _stores) = test_app(Config::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_enabled() {
    let mut config = Config::default();
    config.server.cors_enabled = true;
    config.server.cors_origins = vec!["*".to_string()];
    let (app, _stores) = test_app(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let (app, _stores) = test_app(Config::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(json.get("openapi").is_some(), "Should have 'openapi' field");
    assert!(
        json["openapi"].as_str().unwrap().starts_with("3."),
        "Should be OpenAPI 3.x"
    );
    assert_eq!(json["info"]["title"], "asset-gateway REST API");

    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/bin/download.file/{id}/{filename}"));
    assert!(paths.contains_key("/config"));
    assert!(paths.contains_key("/health"));
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let mut config = Config::default();
    config.server.swagger_ui = true;
    let (app, _stores) = test_app(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Swagger UI should be accessible when enabled"
    );
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let mut config = Config::default();
    config.server.swagger_ui = false;
    let (app, _stores) = test_app(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Swagger UI should not be accessible when disabled"
    );
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = Config::default();
    config.server.bind_address = addr;
    let (gateway, _stores) = create_test_gateway(config);

    let server_gateway = gateway.clone();
    let server_handle = tokio::spawn(async move {
        let config = server_gateway.config();
        let app = create_router(server_gateway, config);
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "ok");

    server_handle.abort();
}
