//! Avatar fetching for cards.
//!
//! Avatars are downloaded once, sniffed, and inlined as `data:` URIs so the
//! layout stays free of I/O. Any failure degrades to the drawn placeholder:
//! a missing or broken avatar never prevents a card from rendering.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;

use crate::error::RenderError;
use crate::model::{AvatarSource, CardInput, CardModel, EngagerRow};

/// Largest avatar body accepted, in bytes.
const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Fetches avatars and turns [`CardInput`]s into renderable [`CardModel`]s.
#[derive(Debug, Clone)]
pub struct AvatarLoader {
    client: Option<Client>,
}

impl AvatarLoader {
    /// Creates a loader that downloads avatars over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client: Some(client),
        })
    }

    /// A loader that never touches the network; every avatar renders as the
    /// placeholder.
    #[must_use]
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Resolves every avatar referenced by `input`.
    ///
    /// Avatars are fetched one after another. Only the engagers that will
    /// actually be drawn are fetched.
    pub async fn resolve(&self, input: CardInput) -> CardModel {
        let avatar = self.load(input.avatar_url.as_deref()).await;

        let mut engagers = input.top_engagers;
        engagers.sort_by_key(|e| e.rank);
        engagers.truncate(crate::model::MAX_ENGAGER_ROWS);

        let mut rows = Vec::with_capacity(engagers.len());
        for engager in engagers {
            let avatar = self.load(engager.avatar_url.as_deref()).await;
            rows.push(EngagerRow {
                rank: engager.rank,
                username: engager.username,
                display_name: engager.display_name,
                engagement_score: engager.engagement_score,
                avatar,
            });
        }

        CardModel {
            username: input.username,
            display_name: input.display_name,
            avatar,
            engagement_score: input.engagement_score,
            top_engagers: rows,
        }
    }

    /// Downloads `url` and inlines it, or returns the placeholder.
    pub async fn load(&self, url: Option<&str>) -> AvatarSource {
        let (Some(client), Some(url)) = (&self.client, url.filter(|u| !u.trim().is_empty())) else {
            return AvatarSource::Placeholder;
        };

        match fetch_data_uri(client, url).await {
            Ok(data_uri) => AvatarSource::Image { data_uri },
            Err(reason) => {
                tracing::warn!(url, %reason, "avatar unavailable, using placeholder");
                AvatarSource::Placeholder
            }
        }
    }
}

async fn fetch_data_uri(client: &Client, url: &str) -> Result<String, String> {
    let mut response = client.get(url).send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    if response
        .content_length()
        .is_some_and(|len| len > MAX_AVATAR_BYTES as u64)
    {
        return Err("avatar exceeds size limit".to_string());
    }

    // Content-Length is optional, so the cap is enforced while streaming.
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
        if bytes.len() + chunk.len() > MAX_AVATAR_BYTES {
            return Err("avatar exceeds size limit".to_string());
        }
        bytes.extend_from_slice(&chunk);
    }

    let mime = sniff_image_type(&bytes).ok_or_else(|| "unsupported image format".to_string())?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)))
}

/// MIME type of a raster format the renderer can decode, from magic bytes.
pub(crate) fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_known_formats() {
        assert_eq!(
            sniff_image_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            Some("image/png")
        );
        assert_eq!(sniff_image_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_image_type(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_image_type(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
    }

    #[test]
    fn rejects_svg_and_html() {
        assert_eq!(sniff_image_type(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"), None);
        assert_eq!(sniff_image_type(b"<!doctype html>"), None);
        assert_eq!(sniff_image_type(b""), None);
    }

    #[tokio::test]
    async fn disabled_loader_always_uses_placeholder() {
        let loader = AvatarLoader::disabled();
        assert_eq!(
            loader.load(Some("https://example.com/a.png")).await,
            AvatarSource::Placeholder
        );
    }

    #[tokio::test]
    async fn missing_url_uses_placeholder() {
        let loader = AvatarLoader::new(1, "castcard-test").expect("loader");
        assert_eq!(loader.load(None).await, AvatarSource::Placeholder);
        assert_eq!(loader.load(Some("  ")).await, AvatarSource::Placeholder);
    }
}
