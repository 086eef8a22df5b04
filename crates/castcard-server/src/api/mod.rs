mod card;
mod metadata;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use castcard_neynar::SocialGraph;
use castcard_render::{AvatarLoader, CardBackend};
use castcard_share::SiteUrls;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::pages;

/// Defaults applied when a card or metadata query omits a parameter.
pub(crate) const DEFAULT_USERNAME: &str = "deba9t6";
pub(crate) const DEFAULT_SCORE: &str = "12";
pub(crate) const DEFAULT_DISPLAY_NAME: &str = "User";
pub(crate) const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/150?u=default&d=identicon";

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn SocialGraph>,
    pub avatars: AvatarLoader,
    pub renderer: Arc<dyn CardBackend>,
    pub urls: SiteUrls,
    /// Recent casts requested per profile view.
    pub cast_window: u32,
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

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Treats a missing or blank query value as absent.
pub(crate) fn param_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/generate-card", get(card::generate_card))
        .route("/api/frame-metadata", get(metadata::frame_metadata))
        .route("/profile/{username}", get(pages::profile_page))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "not_found", "no such route")
}


#[cfg(test)]
mod tests {
    use super::test_support::{body_string, get, state, EchoBackend, FakeGraph};
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn param_or_treats_blank_as_missing() {
        assert_eq!(param_or(None, "x"), "x");
        assert_eq!(param_or(Some(String::new()), "x"), "x");
        assert_eq!(param_or(Some("  ".to_string()), "x"), "x");
        assert_eq!(param_or(Some("alice".to_string()), "x"), "alice");
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = ApiError::new("req-1", "upstream_unavailable", "down").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let response = ApiError::new("req-1", "whatever", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_returns_envelope() {
        let response = get(state(FakeGraph::default(), EchoBackend::default()), "/api/v1/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).expect("json");
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
        assert!(json["meta"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let app = build_app(state(FakeGraph::default(), EchoBackend::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(REQUEST_ID_HEADER, "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).expect("json");
        assert_eq!(json["meta"]["request_id"], "req-abc");
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let response = get(state(FakeGraph::default(), EchoBackend::default()), "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).expect("json");
        assert_eq!(json["error"]["code"], "not_found");
    }
}
