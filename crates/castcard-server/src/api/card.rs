use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use castcard_render::CardInput;
use serde::Deserialize;

use super::{
    param_or, AppState, DEFAULT_AVATAR_URL, DEFAULT_DISPLAY_NAME, DEFAULT_SCORE, DEFAULT_USERNAME,
};

const CARD_ERROR_BODY: &str = "Error generating card";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CardQuery {
    pub username: Option<String>,
    pub score: Option<String>,
    pub display_name: Option<String>,
    pub pfp_url: Option<String>,
}

impl CardQuery {
    fn into_input(self) -> CardInput {
        CardInput {
            username: param_or(self.username, DEFAULT_USERNAME),
            display_name: param_or(self.display_name, DEFAULT_DISPLAY_NAME),
            avatar_url: Some(param_or(self.pfp_url, DEFAULT_AVATAR_URL)),
            engagement_score: param_or(self.score, DEFAULT_SCORE),
            top_engagers: Vec::new(),
        }
    }
}

/// `GET /api/generate-card`: renders a 500x650 PNG card from query params.
pub(super) async fn generate_card(
    State(state): State<AppState>,
    Query(query): Query<CardQuery>,
) -> Response {
    let input = query.into_input();
    let username = input.username.clone();
    let model = state.avatars.resolve(input).await;

    let renderer = Arc::clone(&state.renderer);
    let rendered = tokio::task::spawn_blocking(move || renderer.render(&model)).await;

    match rendered {
        Ok(Ok(card)) => (
            [
                (header::CONTENT_TYPE, card.content_type),
                (header::CACHE_CONTROL, "public, max-age=300"),
            ],
            card.bytes,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!(%username, error = %e, "card render failed");
            card_error()
        }
        Err(e) => {
            tracing::error!(%username, error = %e, "card render task failed");
            card_error()
        }
    }
}

fn card_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        CARD_ERROR_BODY,
    )
        .into_response()
}
