use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use castcard_share::compose_frame_metadata;
use serde::Deserialize;

use super::{param_or, AppState, DEFAULT_SCORE, DEFAULT_USERNAME};

#[derive(Debug, Deserialize)]
pub(super) struct MetadataQuery {
    pub username: Option<String>,
    pub score: Option<String>,
}

/// `GET /api/frame-metadata`: link-preview metadata for a card.
pub(super) async fn frame_metadata(
    State(state): State<AppState>,
    Query(query): Query<MetadataQuery>,
) -> Response {
    let username = param_or(query.username, DEFAULT_USERNAME);
    let score = param_or(query.score, DEFAULT_SCORE);

    let meta = compose_frame_metadata(&state.urls, &username, &score);
    match serde_json::to_value(&meta) {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            tracing::error!(%username, error = %e, "frame metadata serialization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to generate metadata" })),
            )
                .into_response()
        }
    }
}
