use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn app(server: &MockServer) -> Router {
    let catalog =
        CatalogClient::new(&server.uri(), 5, "pricepulse-test/0.1", 0, 0).expect("client");
    build_app(AppState {
        catalog,
        sessions: SessionStore::new(Duration::from_secs(60)),
        stores: Arc::new(StoresFile::builtin()),
    })
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

fn session_cookie_of(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie set")
        .to_owned()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Follows the loading view's refresh until the session's search settles.
async fn settled_home(app: &Router, cookie: &str) -> String {
    for _ in 0..250 {
        let response = app
            .clone()
            .oneshot(get_request("/", Some(cookie)))
            .await
            .expect("response");
        let html = body_text(response).await;
        if !html.contains("product-card shimmer") {
            return html;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("search did not settle");
}

fn product_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "brand": "Nestle",
        "all_prices": [
            { "store_name": "A", "price": 100, "url": "https://a.example/p" },
            { "store_name": "C", "price": 120, "url": "https://c.example/p" },
            { "store_name": "B", "price": 150, "url": "https://b.example/p" }
        ]
    })
}

async fn expect_no_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn submission_renders_loading_then_settled_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "milk"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    product_json(1, "Milk Pak"),
                    product_json(2, "Olpers"),
                    product_json(3, "Haleeb"),
                ]))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let response = app
        .clone()
        .oneshot(get_request("/?query=milk", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL),
        Some(&HeaderValue::from_static("no-store"))
    );
    let cookie = session_cookie_of(&response);
    let html = body_text(response).await;
    assert_eq!(html.matches("product-card shimmer").count(), 6);
    assert_eq!(html.matches("href=\"/product/").count(), 0);
    assert!(html.contains("http-equiv=\"refresh\""));

    let pending = app
        .clone()
        .oneshot(get_request("/", Some(&cookie)))
        .await
        .expect("response");
    assert!(pending.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(
        body_text(pending).await.matches("product-card shimmer").count(),
        6
    );

    let html = settled_home(&app, &cookie).await;
    assert_eq!(html.matches("href=\"/product/").count(), 3);
    assert!(html.contains("Pulse Results (3)"));
    assert!(html.contains("value=\"milk\""));
    assert!(!html.contains("http-equiv=\"refresh\""));
}

#[tokio::test]
async fn failed_search_shows_notice_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let response = app
        .clone()
        .oneshot(get_request("/?query=milk", None))
        .await
        .expect("response");
    let cookie = session_cookie_of(&response);

    let html = settled_home(&app, &cookie).await;
    assert!(html.contains("We couldn't reach the price catalog"));

    let later = app
        .oneshot(get_request("/", Some(&cookie)))
        .await
        .expect("response");
    assert!(!body_text(later).await.contains("couldn't reach"));
}

#[tokio::test]
async fn duplicate_submission_keeps_previous_grid_selectable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "milk"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(42, "Milk Pak")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "tea"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(42, "Fetched")))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recommend/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let first = app
        .clone()
        .oneshot(get_request("/?query=milk", None))
        .await
        .expect("response");
    let cookie = session_cookie_of(&first);
    settled_home(&app, &cookie).await;

    for _ in 0..2 {
        let loading = app
            .clone()
            .oneshot(get_request("/?query=tea", Some(&cookie)))
            .await
            .expect("response");
        assert!(body_text(loading).await.contains("product-card shimmer"));
    }

    let detail = app
        .clone()
        .oneshot(get_request("/product/42", Some(&cookie)))
        .await
        .expect("response");
    assert!(body_text(detail).await.contains("<h1>Milk Pak</h1>"));

    let html = settled_home(&app, &cookie).await;
    assert!(html.contains("value=\"tea\""));
}

#[tokio::test]
async fn blank_query_issues_no_request() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let response = app(&server)
        .oneshot(get_request("/?query=%20%20", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("Pulse Results"));
}

#[tokio::test]
async fn uncarried_detail_fetches_product_and_recommendations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(42, "Milk Pak")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recommend/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_request("/product/42", None))
        .await
        .expect("response");
    let html = body_text(response).await;

    let a = html.find("<h4>A</h4>").expect("A row");
    let c = html.find("<h4>C</h4>").expect("C row");
    let b = html.find("<h4>B</h4>").expect("B row");
    assert!(a < c && c < b);
    assert!(html.contains("BEST VALUE"));
    assert!(html.contains("<title>Product Detail | PricePulse PK</title>"));
}

#[tokio::test]
async fn failed_detail_requests_render_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/42"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recommend/42"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_request("/product/42", None))
        .await
        .expect("response");
    assert!(body_text(response).await.contains("No Pulse Found."));
}

#[tokio::test]
async fn carried_detail_skips_product_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(42, "Milk Pak")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(42, "Fetched")))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recommend/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server);

    let search = app
        .clone()
        .oneshot(get_request("/?query=milk", None))
        .await
        .expect("response");
    let cookie = session_cookie_of(&search);
    settled_home(&app, &cookie).await;

    let detail = app
        .oneshot(get_request("/product/42", Some(&cookie)))
        .await
        .expect("response");
    let html = body_text(detail).await;
    assert!(html.contains("<title>Milk Pak | PricePulse PK</title>"));
    assert!(html.contains("<h1>Milk Pak</h1>"));
}

#[tokio::test]
async fn non_numeric_product_id_makes_no_requests() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let response = app(&server)
        .oneshot(get_request("/product/abc", None))
        .await
        .expect("response");
    assert!(body_text(response).await.contains("No Pulse Found."));
}

#[tokio::test]
async fn static_pages_render_with_titles() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let app = app(&server);

    for (uri, title) in [
        ("/stores", "Our Partner Stores | PricePulse PK"),
        ("/insights", "Smart Grocery Insights | PricePulse PK"),
        ("/contact", "Contact Us | PricePulse PK"),
    ] {
        let response = app.clone().oneshot(get_request(uri, None)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response)
            .await
            .contains(&format!("<title>{title}</title>")));
    }
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let response = app(&server)
        .oneshot(get_request("/admin", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response)
        .await
        .contains("<title>PricePulse PK</title>"));
}

#[tokio::test]
async fn request_id_is_propagated() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(
            Request::builder()
                .uri("/contact")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response.headers().get("x-request-id"),
        Some(&HeaderValue::from_static("req-123"))
    );
}

#[tokio::test]
async fn health_reports_catalog_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_request("/health", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("json parse");
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["catalog"], "ok");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn health_is_degraded_when_catalog_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_request("/health", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("json parse");
    assert_eq!(json["data"]["status"], "degraded");
}
