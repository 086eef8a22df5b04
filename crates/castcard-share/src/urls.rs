use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes `value` for use as a URL query value or path segment,
/// matching `encodeURIComponent`.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Absolute URLs of the public site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    base: String,
}

impl SiteUrls {
    /// `base` is the public origin, e.g. `https://activity-tracker.online`.
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Card image endpoint for `username` and `score`.
    #[must_use]
    pub fn card_image_url(&self, username: &str, score: &str) -> String {
        format!(
            "{}/api/generate-card?username={}&score={}",
            self.base,
            encode_component(username),
            encode_component(score)
        )
    }

    /// Card image endpoint that also carries the display name and avatar, so
    /// the rendered card matches the profile without another lookup.
    #[must_use]
    pub fn full_card_image_url(
        &self,
        username: &str,
        score: &str,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> String {
        format!(
            "{}&displayName={}&pfpUrl={}",
            self.card_image_url(username, score),
            encode_component(display_name),
            encode_component(avatar_url.unwrap_or_default())
        )
    }

    /// Profile view for `username`.
    #[must_use]
    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/profile/{}", self.base, encode_component(username))
    }

    /// Static preview image used before any stats are known.
    #[must_use]
    pub fn default_preview_image_url(&self) -> String {
        format!("{}/og-image.jpg", self.base)
    }

    /// Splash icon shown while the mini-app launches.
    #[must_use]
    pub fn splash_image_url(&self) -> String {
        format!("{}/icon.png", self.base)
    }
}
