//! Server-rendered profile page.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use castcard_neynar::{fetch_activity, ActivitySnapshot};
use castcard_render::{CardBackend, CardInput, SvgBackend};
use castcard_share::session::{BUSY_LABEL, IDLE_LABEL};
use castcard_share::{
    compose_profile_page_meta, detect_context, DetectedContext, HostSignals, ProfilePageMeta,
    SharePayload, CLIPBOARD_CONFIRMATION,
};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::api::AppState;

const PROFILE_TEMPLATE: &str = include_str!("../templates/profile.html");
const NOT_FOUND_TEMPLATE: &str = include_str!("../templates/not_found.html");
const EMBEDDED_SHARE_TEMPLATE: &str = include_str!("../templates/share_embedded.html");

/// `GET /profile/{username}`.
///
/// Either the whole profile renders or the "User not found" page does;
/// a failed lookup never yields partial stats. The share control depends on
/// whether the request comes from inside an embedding host app.
pub async fn profile_page(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Response {
    let snapshot = match fetch_activity(state.graph.as_ref(), &username, state.cast_window).await {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_not_found() => {
            tracing::info!(%username, "profile not found");
            return (StatusCode::NOT_FOUND, Html(render_not_found(&username))).into_response();
        }
        Err(e) => {
            tracing::warn!(%username, error = %e, "profile lookup failed");
            return (StatusCode::BAD_GATEWAY, Html(render_not_found(&username))).into_response();
        }
    };

    let payload = SharePayload::new(&state.urls, &snapshot.profile, &snapshot.stats);
    let model = state
        .avatars
        .resolve(CardInput {
            username: snapshot.profile.username.clone(),
            display_name: snapshot.profile.display_name.clone(),
            avatar_url: snapshot.profile.avatar_url.clone(),
            engagement_score: payload.engagement_score.to_string(),
            top_engagers: snapshot.top_engagers.clone(),
        })
        .await;

    let card_svg = match SvgBackend.render(&model) {
        Ok(card) => String::from_utf8_lossy(&card.bytes).into_owned(),
        Err(e) => {
            tracing::error!(%username, error = %e, "profile card render failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let meta = compose_profile_page_meta(
        &state.urls,
        &snapshot.profile.username,
        Some(payload.card_image_url.clone()),
    );

    let context = detect_context(&request_signals(&headers));
    tracing::debug!(%username, ?context, "rendering profile page");

    match render_profile(&meta, &snapshot, &payload, &card_svg, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(%username, error = %e, "profile page metadata failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn render_profile(
    meta: &ProfilePageMeta,
    snapshot: &ActivitySnapshot,
    payload: &SharePayload,
    card_svg: &str,
    context: DetectedContext,
) -> Result<String, serde_json::Error> {
    let meta_tags = meta
        .meta_tags()?
        .into_iter()
        .map(|(key, content)| {
            // Open Graph uses `property`; everything else, `fc:frame` included, uses `name`.
            let attr = if key.starts_with("og:") { "property" } else { "name" };
            format!(
                r#"<meta {attr}="{key}" content="{}">"#,
                encode_double_quoted_attribute(&content)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let stats = &snapshot.stats;
    let values = [
        ("title", encode_text(&meta.title).into_owned()),
        ("meta_tags", meta_tags),
        ("card_svg", card_svg.to_string()),
        ("likes", stats.total_likes.to_string()),
        ("recasts", stats.total_recasts.to_string()),
        ("replies", stats.total_replies.to_string()),
        ("casts", stats.cast_count.to_string()),
        ("rate", stats.detailed_rate_label()),
        ("share_block", render_share_block(payload, context)),
        (
            "download_url",
            encode_double_quoted_attribute(&payload.card_image_url).into_owned(),
        ),
        ("download_name", download_name(&payload.username)),
    ];

    Ok(fill(PROFILE_TEMPLATE, &values))
}

fn request_signals(headers: &HeaderMap) -> HostSignals<'_> {
    HostSignals {
        hostname: header_str(headers, &header::HOST),
        user_agent: header_str(headers, &header::USER_AGENT),
        host_object_present: false,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Share control for the page. On the open web it is a compose-intent link;
/// inside a host app it is a button that tries the host's native share and
/// falls back to the clipboard.
fn render_share_block(payload: &SharePayload, context: DetectedContext) -> String {
    match context {
        DetectedContext::Web => format!(
            r#"<a class="button share" href="{}" target="_blank" rel="noopener">{IDLE_LABEL}</a>"#,
            encode_double_quoted_attribute(&payload.intent_url())
        ),
        DetectedContext::EmbeddedHost => {
            let native = payload.native_payload();
            let attr = |value: &str| encode_double_quoted_attribute(value).into_owned();
            fill(
                EMBEDDED_SHARE_TEMPLATE,
                &[
                    ("share_text", attr(&native.text)),
                    ("share_image", attr(&native.image_url)),
                    ("clipboard_text", attr(&payload.clipboard_text())),
                    ("confirmation", attr(CLIPBOARD_CONFIRMATION)),
                    ("busy_label", attr(BUSY_LABEL)),
                    ("idle_label", encode_text(IDLE_LABEL).into_owned()),
                ],
            )
        }
    }
}

fn render_not_found(username: &str) -> String {
    let handle = format!("@{}", username.trim_start_matches('@'));
    fill(
        NOT_FOUND_TEMPLATE,
        &[("handle", encode_text(&handle).into_owned())],
    )
}

/// File name offered when the card is downloaded.
fn download_name(username: &str) -> String {
    let safe: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    format!("activity-card-{safe}.png")
}

/// Substitutes `{{key}}` placeholders in one pass, so substituted values are
/// never rescanned. Unknown placeholders are left as-is.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
