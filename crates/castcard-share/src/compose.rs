//! Share links and embedded-host sharing for an activity card.
//!
//! The caller decides which [`ShareContext`] applies; [`detect_context`] is a
//! pure helper for callers that only have request signals to go on.

use castcard_core::{EngagementStats, UserProfile};

use crate::error::ShareError;
use crate::urls::{encode_component, SiteUrls};

const COMPOSE_URL: &str = "https://warpcast.com/~/compose";

/// Message shown after the clipboard fallback succeeds.
pub const CLIPBOARD_CONFIRMATION: &str =
    "Activity card copied to clipboard! Paste in your Base App cast.";

/// Everything needed to share one user's card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub username: String,
    pub display_name: String,
    pub engagement_score: u64,
    pub total_likes: u64,
    pub total_recasts: u64,
    pub total_replies: u64,
    pub card_image_url: String,
    pub profile_url: String,
}

impl SharePayload {
    #[must_use]
    pub fn new(urls: &SiteUrls, profile: &UserProfile, stats: &EngagementStats) -> Self {
        let score = stats.headline_score();
        Self {
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            engagement_score: score,
            total_likes: stats.total_likes,
            total_recasts: stats.total_recasts,
            total_replies: stats.total_replies,
            card_image_url: urls.full_card_image_url(
                &profile.username,
                &score.to_string(),
                &profile.display_name,
                profile.avatar_url.as_deref(),
            ),
            profile_url: urls.profile_url(&profile.username),
        }
    }

    /// Text of the cast.
    #[must_use]
    pub fn share_text(&self) -> String {
        format!(
            "📊 Just checked my Farcaster engagement on Activity Tracker!\n\
             \n\
             My engagement score: {score}\n\
             Username: @{username}\n\
             ❤️ {likes} likes · 🔄 {recasts} recasts · 💬 {replies} replies\n\
             \n\
             Are you staying based? Check YOUR engagement stats 👇\n\
             \n\
             Track your activity. Know your impact. Stay Based. 🟣\n\
             Built on /base.",
            score = self.engagement_score,
            username = self.username,
            likes = self.total_likes,
            recasts = self.total_recasts,
            replies = self.total_replies,
        )
    }

    /// Compose-intent URL with the share text and the card and profile
    /// embeds.
    #[must_use]
    pub fn intent_url(&self) -> String {
        compose_intent_url(
            &self.share_text(),
            &[&self.card_image_url, &self.profile_url],
        )
    }

    /// Text written to the clipboard when the host cannot share natively.
    #[must_use]
    pub fn clipboard_text(&self) -> String {
        format!("{}\n\n{}", self.share_text(), self.card_image_url)
    }

    #[must_use]
    pub fn native_payload(&self) -> NativeSharePayload {
        NativeSharePayload {
            text: self.share_text(),
            image_url: self.card_image_url.clone(),
        }
    }
}

/// Builds a compose-intent URL. Values are encoded like `encodeURIComponent`.
#[must_use]
pub fn compose_intent_url(text: &str, embeds: &[&str]) -> String {
    let mut url = format!("{COMPOSE_URL}?text={}", encode_component(text));
    for embed in embeds {
        url.push_str("&embeds[]=");
        url.push_str(&encode_component(embed));
    }
    url
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeSharePayload {
    pub text: String,
    pub image_url: String,
}

/// Sharing primitives offered by an embedding host app.
pub trait HostCapabilities {
    fn can_native_share(&self) -> bool;

    /// # Errors
    ///
    /// Returns [`ShareError::NativeShare`] when the host rejects the share.
    fn native_share(&self, payload: &NativeSharePayload) -> Result<(), ShareError>;
}

pub trait Clipboard {
    /// # Errors
    ///
    /// Returns [`ShareError::Clipboard`] when the write fails.
    fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// Where the share is happening.
#[derive(Clone, Copy)]
pub enum ShareContext<'a> {
    /// Plain browser; share through the compose-intent URL.
    Web,
    /// Inside a host app that may expose native sharing.
    EmbeddedHost {
        host: &'a dyn HostCapabilities,
        clipboard: &'a dyn Clipboard,
    },
}

impl std::fmt::Debug for ShareContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => f.write_str("Web"),
            Self::EmbeddedHost { .. } => f.write_str("EmbeddedHost"),
        }
    }
}

/// Result of one share attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The caller should open this URL.
    OpenUrl(String),
    NativeShared,
    CopiedToClipboard { confirmation: &'static str },
    /// Every path failed; the failures were logged.
    NoOp,
}

impl ShareOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

/// Shares `payload` in `context`. Never fails: host errors are logged and
/// reduce to a fallback or [`ShareOutcome::NoOp`].
#[must_use]
pub fn share(payload: &SharePayload, context: ShareContext<'_>) -> ShareOutcome {
    match context {
        ShareContext::Web => ShareOutcome::OpenUrl(payload.intent_url()),
        ShareContext::EmbeddedHost { host, clipboard } => {
            if host.can_native_share() {
                match host.native_share(&payload.native_payload()) {
                    Ok(()) => return ShareOutcome::NativeShared,
                    Err(e) => {
                        tracing::warn!(
                            username = %payload.username,
                            error = %e,
                            "native share failed; falling back to clipboard"
                        );
                    }
                }
            }

            match clipboard.write_text(&payload.clipboard_text()) {
                Ok(()) => ShareOutcome::CopiedToClipboard {
                    confirmation: CLIPBOARD_CONFIRMATION,
                },
                Err(e) => {
                    tracing::error!(username = %payload.username, error = %e, "share failed");
                    ShareOutcome::NoOp
                }
            }
        }
    }
}

/// Signals a caller may have about its surroundings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostSignals<'a> {
    pub hostname: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    /// The host injected its bridge object.
    pub host_object_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedContext {
    Web,
    EmbeddedHost,
}

/// Classifies `signals`; anything unrecognised is [`DetectedContext::Web`].
#[must_use]
pub fn detect_context(signals: &HostSignals<'_>) -> DetectedContext {
    let host_match = signals
        .hostname
        .is_some_and(|h| h.to_ascii_lowercase().contains("baseapp"));
    let agent_match = signals.user_agent.is_some_and(|ua| ua.contains("BaseApp"));

    if host_match || agent_match || signals.host_object_present {
        DetectedContext::EmbeddedHost
    } else {
        DetectedContext::Web
    }
}

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;
