mod home;
mod info;
mod product;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pricepulse_catalog::CatalogClient;
use pricepulse_core::StoresFile;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::middleware::{request_id, session_cookie, RequestId};
use crate::session::SessionStore;
use crate::shell::{Page, Route};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub sessions: SessionStore,
    pub stores: Arc<StoresFile>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

/// Body shown when a product cannot be resolved.
pub(crate) fn not_found_body() -> String {
    "<div class=\"container not-found\">No Pulse Found.</div>\n".to_owned()
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/product/{id}", get(product::product))
        .route("/stores", get(info::stores))
        .route("/insights", get(info::insights))
        .route("/contact", get(info::contact))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(axum::middleware::from_fn(session_cookie)),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    // Anything the router did not match resolves to `Route::NotFound`.
    let route = Route::from_path(uri.path());
    let body = "<div class=\"container not-found\">\n<h1>Page Not Found</h1>\n\
                <p>This page has no pulse.</p>\n<a href=\"/\">Back to Search</a>\n</div>\n"
        .to_owned();
    (StatusCode::NOT_FOUND, Page::new(route, None, body).render())
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.catalog.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    catalog: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: catalog unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        catalog: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
