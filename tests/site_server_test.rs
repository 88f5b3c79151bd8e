use httpmock::prelude::*;
use kislap_sites::core::color::ColorFormat;
use kislap_sites::{
    app, ApiProjectSource, HostResolver, HostRouting, SiteEngine, TemplateRegistry,
};
use reqwest::header::{CONTENT_SECURITY_POLICY, CONTENT_TYPE, HOST};
use reqwest::StatusCode;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const FRAME_POLICY: &str = "frame-ancestors 'self' https://kislap.app https://*.kislap.app;";

async fn spawn_app(api: &MockServer) -> SocketAddr {
    let source = ApiProjectSource::new(&api.base_url(), Duration::from_secs(2)).unwrap();
    let engine = Arc::new(SiteEngine::new(
        source,
        Arc::new(TemplateRegistry::standard()),
        ColorFormat::Oklch,
        "kislap.app",
    ));
    let routing = HostRouting::new(HostResolver::with_default_reserved("kislap.app")).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(engine, routing)).await.unwrap();
    });
    addr
}

async fn get(addr: SocketAddr, host: &str, path: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(format!("http://{}{}", addr, path))
        .header(HOST, host)
        .send()
        .await
        .unwrap()
}

async fn mock_projects(api: &MockServer) {
    api.mock_async(|when, then| {
        when.method(GET)
            .path("/api/projects/show/sub-domain/acme")
            .query_param("level", "full");
        then.status(200).json_body(json!({
            "data": {
                "id": 1,
                "name": "acme",
                "type": "biz",
                "published": true,
                "og_image_url": "https://cdn.kislap.app/acme.png",
                "biz": {
                    "name": "Acme Bakery",
                    "tagline": "Fresh bread daily",
                    "theme_object": "{\"styles\":{\"light\":{\"primary\":\"#ff0000\"},\"dark\":{\"primary\":\"#00ff00\"}}}"
                }
            }
        }));
    })
    .await;
    api.mock_async(|when, then| {
        when.method(GET).path("/api/projects/show/sub-domain/draft");
        then.status(200).json_body(json!({
            "data": {"name": "draft", "type": "portfolio", "published": false, "portfolio": {"name": "Draft"}}
        }));
    })
    .await;
    api.mock_async(|when, then| {
        when.method(GET).path("/api/projects/show/sub-domain/odd");
        then.status(200).json_body(json!({
            "data": {"name": "odd", "type": "portfolio", "published": true,
                     "portfolio": {"name": "Odd", "layout_name": "nonexistent-layout"}}
        }));
    })
    .await;
    api.mock_async(|when, then| {
        when.method(GET).path("/api/projects/show/sub-domain/ghost");
        then.status(200).json_body(json!({"data": null}));
    })
    .await;
    api.mock_async(|when, then| {
        when.method(GET).path("/api/projects/show/sub-domain/flaky");
        then.status(502);
    })
    .await;
}

#[tokio::test]
async fn test_tenant_subdomain_renders_biz_default() {
    let api = MockServer::start_async().await;
    mock_projects(&api).await;
    let addr = spawn_app(&api).await;

    let resp = get(addr, "acme.kislap.app", "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_SECURITY_POLICY).unwrap(),
        FRAME_POLICY
    );
    let html = resp.text().await.unwrap();
    assert!(html.contains("layout-biz-default"));
    assert!(html.contains("<h1>Acme Bakery</h1>"));
    assert!(html.contains("--primary:oklch("));
    assert!(html.contains("https://acme.kislap.app"));
    assert!(html.contains("https://cdn.kislap.app/acme.png"));
    assert!(html.contains("href=\"?mode=dark\""));
}

#[tokio::test]
async fn test_mode_query_switches_palette() {
    let api = MockServer::start_async().await;
    mock_projects(&api).await;
    let addr = spawn_app(&api).await;

    let light = get(addr, "acme.kislap.app", "/").await.text().await.unwrap();
    let dark = get(addr, "acme.kislap.app", "/?mode=dark").await.text().await.unwrap();

    assert!(dark.contains("class=\"dark\""));
    assert!(dark.contains("href=\"?mode=light\""));
    assert_ne!(light, dark);
}

#[tokio::test]
async fn test_error_states() {
    let api = MockServer::start_async().await;
    mock_projects(&api).await;
    let addr = spawn_app(&api).await;

    let resp = get(addr, "ghost.kislap.app", "/").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("data-state=\"not-found\""));

    // API faults look the same as a missing project
    let resp = get(addr, "flaky.kislap.app", "/").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = get(addr, "draft.kislap.app", "/").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.text().await.unwrap().contains("data-state=\"not-published\""));

    let resp = get(addr, "odd.kislap.app", "/").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.text().await.unwrap().is_empty());

    let resp = get(addr, "a.b.kislap.app", "/").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.headers().get(CONTENT_SECURITY_POLICY).is_none());
    assert!(resp.text().await.unwrap().contains("data-state=\"invalid-domain\""));
}

#[tokio::test]
async fn test_root_traffic_is_not_rewritten() {
    let api = MockServer::start_async().await;
    let api_mock = api
        .mock_async(|when, then| {
            when.method(GET).path_contains("/api/projects");
            then.status(500);
        })
        .await;
    let addr = spawn_app(&api).await;

    for host in ["kislap.app", "www.kislap.app", "app.kislap.app", "localhost:3000"] {
        let resp = get(addr, host, "/").await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", host);
        assert!(resp.headers().get(CONTENT_SECURITY_POLICY).is_none());
        assert!(resp.text().await.unwrap().contains("layout-landing"));
    }

    let resp = get(addr, "kislap.app", "/pricing").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // platform traffic never reaches the project API
    api_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_reserved_paths_pass_through() {
    let api = MockServer::start_async().await;
    mock_projects(&api).await;
    let addr = spawn_app(&api).await;

    let resp = get(addr, "acme.kislap.app", "/healthz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(CONTENT_SECURITY_POLICY).is_none());
    assert_eq!(resp.text().await.unwrap(), "ok");

    // tenant sub-paths render the single-page site
    let resp = get(addr, "acme.kislap.app", "/about").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_SECURITY_POLICY).unwrap(),
        FRAME_POLICY
    );
}

#[tokio::test]
async fn test_sites_path_never_serves_another_tenant() {
    let api = MockServer::start_async().await;
    mock_projects(&api).await;
    let bob_mock = api
        .mock_async(|when, then| {
            when.method(GET).path("/api/projects/show/sub-domain/bob");
            then.status(200).json_body(json!({
                "data": {"name": "bob", "type": "portfolio", "published": true, "portfolio": {"name": "Bob Builder"}}
            }));
        })
        .await;
    let addr = spawn_app(&api).await;

    // the tenant comes from the host, not the path
    let resp = get(addr, "acme.kislap.app", "/sites/bob").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_SECURITY_POLICY).unwrap(),
        FRAME_POLICY
    );
    let html = resp.text().await.unwrap();
    assert!(html.contains("Acme Bakery"));
    assert!(!html.contains("Bob Builder"));

    // platform and unknown hosts cannot reach tenant content at all
    let resp = get(addr, "kislap.app", "/sites/bob").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().get(CONTENT_SECURITY_POLICY).is_none());
    assert!(!resp.text().await.unwrap().contains("Bob Builder"));

    let resp = get(addr, "not-a-domain", "/sites/bob").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("data-state=\"invalid-domain\""));

    bob_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_tenant_preview_card() {
    let api = MockServer::start_async().await;
    mock_projects(&api).await;
    let addr = spawn_app(&api).await;

    for host in ["acme.kislap.app", "ghost.kislap.app"] {
        let resp = get(addr, host, "/og-image.png").await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", host);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(
            resp.headers().get(CONTENT_SECURITY_POLICY).unwrap(),
            FRAME_POLICY
        );
        let png = resp.bytes().await.unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    // no tenant, no card
    let resp = get(addr, "kislap.app", "/sites/acme/og-image.png").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
