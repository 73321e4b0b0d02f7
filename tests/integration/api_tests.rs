//! API integration tests for conversion and error handling.
//!
//! Tests verify:
//! - Successful conversion returns PNG with the expected headers
//! - Missing or malformed `url` parameters return 400 JSON errors
//! - Upstream and decode failures return 500 JSON errors
//! - Health, cache stats, CORS and static asset routes

use axum::http::StatusCode;
use tower::ServiceExt;

use tiff_proxy::convert::{is_png, ConvertService};
use tiff_proxy::{create_router, RouterConfig};

use super::test_utils::{
    body_bytes, body_json, convert_uri, create_test_png, create_test_tiff, get, MockImageSource,
};

const MOON_URL: &str = "https://images.example.org/moon.0001.tif";

fn test_router(source: MockImageSource) -> axum::Router {
    let service = ConvertService::with_cache_capacity(source, 10);
    create_router(service, RouterConfig::new().with_tracing(false))
}

// =============================================================================
// Successful Conversion
// =============================================================================

#[tokio::test]
async fn test_convert_success() {
    let source = MockImageSource::new().with_image(MOON_URL, create_test_tiff(32, 16));
    let router = test_router(source);

    let response = router.oneshot(get(convert_uri(MOON_URL))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(response.headers().get("x-cache-hit").unwrap(), "false");
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );

    let body = body_bytes(response).await;
    assert!(is_png(&body), "Response should be a PNG");

    let decoded = image::load_from_memory_with_format(&body, image::ImageFormat::Png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 16));
}

#[tokio::test]
async fn test_convert_custom_cache_max_age() {
    let source = MockImageSource::new().with_image(MOON_URL, create_test_tiff(4, 4));
    let service = ConvertService::with_cache_capacity(source, 10);
    let router = create_router(
        service,
        RouterConfig::new().with_cache_max_age(60).with_tracing(false),
    );

    let response = router.oneshot(get(convert_uri(MOON_URL))).await.unwrap();
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=60"
    );
}

// =============================================================================
// Client Errors
// =============================================================================

#[tokio::test]
async fn test_missing_url_returns_400() {
    let source = MockImageSource::new();
    let counter = source.counter();
    let router = test_router(source);

    let response = router.oneshot(get("/convert-tiff")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid input: No URL provided");
    assert_eq!(json["code"], "invalid_input");
    assert_eq!(counter.total().await, 0);
}

#[tokio::test]
async fn test_empty_url_returns_400() {
    let router = test_router(MockImageSource::new());

    let response = router.oneshot(get("/convert-tiff?url=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_url_returns_400() {
    let router = test_router(MockImageSource::new());

    for bad in ["moon.tif", "ftp://example.com/moon.tif", "http://"] {
        let response = router.clone().oneshot(get(convert_uri(bad))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "url: {}", bad);

        let json = body_json(response).await;
        assert_eq!(json["code"], "invalid_input");
        assert!(json["error"].as_str().unwrap().starts_with("Invalid input"));
    }
}

#[tokio::test]
async fn test_repeated_url_param_uses_first() {
    let other = "https://images.example.org/other.tif";
    let source = MockImageSource::new()
        .with_image(MOON_URL, create_test_tiff(8, 4))
        .with_image(other, create_test_tiff(4, 4));
    let counter = source.counter();
    let router = test_router(source);

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", MOON_URL)
        .append_pair("url", other)
        .finish();
    let uri = format!("/convert-tiff?{}", query);
    let response = router.oneshot(get(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let decoded = image::load_from_memory(&body_bytes(response).await).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 4));
    assert_eq!(counter.get(MOON_URL).await, 1);
    assert_eq!(counter.get(other).await, 0);
}

#[tokio::test]
async fn test_repeated_url_param_with_empty_first_is_json_400() {
    let router = test_router(MockImageSource::new());

    let response = router
        .oneshot(get("/convert-tiff?url=&url=http%3A%2F%2Fb%2Fy.tif"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid input: No URL provided");
    assert_eq!(json["code"], "invalid_input");
    assert_eq!(json["status"], 400);
}

// =============================================================================
// Server Errors
// =============================================================================

#[tokio::test]
async fn test_upstream_not_found_returns_500() {
    let router = test_router(MockImageSource::new());

    let response = router
        .oneshot(get(convert_uri("https://images.example.org/missing.tif")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "fetch_failed");
    assert!(json["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_non_tiff_source_returns_500() {
    let url = "https://images.example.org/photo.png";
    let source = MockImageSource::new().with_image(url, create_test_png());
    let router = test_router(source);

    let response = router.oneshot(get(convert_uri(url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "decode_failed");
}

#[tokio::test]
async fn test_garbage_source_returns_500() {
    let url = "https://images.example.org/garbage.tif";
    let source = MockImageSource::new().with_image(url, b"II*\0garbage".to_vec());
    let router = test_router(source);

    let response = router.oneshot(get(convert_uri(url))).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "decode_failed");
}

// =============================================================================
// Other Routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = test_router(MockImageSource::new());

    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cache_stats_empty() {
    let router = test_router(MockImageSource::new());

    let response = router.oneshot(get("/cache-stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["cached_images"], 0);
    assert_eq!(json["max_cache_size"], 10);
    assert_eq!(json["cache_keys"], serde_json::json!([]));
}

async fn allow_origin_for(router: axum::Router, origin: &str) -> Option<String> {
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("origin", origin)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get("access-control-allow-origin")
        .map(|v| v.to_str().unwrap().to_string())
}

fn cors_router(origins: Vec<String>) -> axum::Router {
    let service = ConvertService::with_cache_capacity(MockImageSource::new(), 10);
    create_router(
        service,
        RouterConfig::new()
            .with_tracing(false)
            .with_cors_origins(origins),
    )
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let router = test_router(MockImageSource::new());

    let allowed = allow_origin_for(router, "https://viewer.example.org").await;
    assert_eq!(allowed.as_deref(), Some("*"));
}

#[tokio::test]
async fn test_cors_configured_origins() {
    let router = cors_router(vec!["https://a.example".to_string()]);

    let allowed = allow_origin_for(router.clone(), "https://a.example").await;
    assert_eq!(allowed.as_deref(), Some("https://a.example"));

    let other = allow_origin_for(router, "https://b.example").await;
    assert_eq!(other, None);
}

#[tokio::test]
async fn test_cors_empty_origin_list_allows_none() {
    let router = cors_router(Vec::new());

    assert_eq!(allow_origin_for(router.clone(), "https://a.example").await, None);
    assert_eq!(allow_origin_for(router, "https://viewer.example.org").await, None);
}

#[tokio::test]
async fn test_unknown_route_without_static_dir_is_404() {
    let router = test_router(MockImageSource::new());

    let response = router.oneshot(get("/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_dir_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>viewer</h1>").unwrap();

    let service = ConvertService::with_cache_capacity(MockImageSource::new(), 10);
    let router = create_router(
        service,
        RouterConfig::new()
            .with_tracing(false)
            .with_static_dir(dir.path()),
    );

    let response = router.clone().oneshot(get("/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"<h1>viewer</h1>");

    // API routes still take precedence
    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
