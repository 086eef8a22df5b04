//! Link-preview metadata for the card endpoint and the profile page.

use serde::Serialize;

use crate::urls::SiteUrls;

const OG_DESCRIPTION: &str = "Just checked my Farcaster engagement on Activity Tracker!";
const FRAME_VERSION: &str = "1.0";
const FRAME_BUTTON_LABEL: &str = "View Full Stats";
const FRAME_BUTTON_ACTION: &str = "post";

const EMBED_VERSION: &str = "next";
const EMBED_BUTTON_TITLE: &str = "View Stats";
const EMBED_ACTION_TYPE: &str = "launch_miniapp";
const APP_NAME: &str = "Activity Tracker";
const SPLASH_BACKGROUND: &str = "#0a1628";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameMetadata {
    pub title: String,
    pub description: String,
    pub og: OpenGraph,
    pub fc: FarcasterMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarcasterMeta {
    pub frame: FrameDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescriptor {
    pub version: String,
    pub image_url: String,
    pub buttons: Vec<FrameButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameButton {
    pub label: String,
    pub action: String,
    pub target: String,
}

impl FrameMetadata {
    /// Flattens the metadata into `(name, content)` pairs for `<meta>` tags.
    ///
    /// Frame buttons are numbered from 1, e.g. `fc:frame:button:1:action`.
    #[must_use]
    pub fn to_flat_pairs(&self) -> Vec<(String, String)> {
        let frame = &self.fc.frame;
        let mut pairs = vec![
            ("title".to_string(), self.title.clone()),
            ("description".to_string(), self.description.clone()),
            ("og:title".to_string(), self.og.title.clone()),
            ("og:description".to_string(), self.og.description.clone()),
            ("og:image".to_string(), self.og.image.clone()),
            ("fc:frame".to_string(), frame.version.clone()),
            ("fc:frame:image".to_string(), frame.image_url.clone()),
        ];

        for (i, button) in frame.buttons.iter().enumerate() {
            let n = i + 1;
            pairs.push((format!("fc:frame:button:{n}"), button.label.clone()));
            pairs.push((format!("fc:frame:button:{n}:action"), button.action.clone()));
            pairs.push((format!("fc:frame:button:{n}:target"), button.target.clone()));
        }

        pairs
    }
}

/// Builds the frame metadata served by the metadata endpoint.
#[must_use]
pub fn compose_frame_metadata(urls: &SiteUrls, username: &str, score: &str) -> FrameMetadata {
    let title = format!("{username}'s Activity Card");
    let image_url = urls.card_image_url(username, score);

    FrameMetadata {
        description: format!("Check {username}'s Farcaster engagement score: {score}"),
        og: OpenGraph {
            title: title.clone(),
            description: OG_DESCRIPTION.to_string(),
            image: image_url.clone(),
        },
        fc: FarcasterMeta {
            frame: FrameDescriptor {
                version: FRAME_VERSION.to_string(),
                image_url,
                buttons: vec![FrameButton {
                    label: FRAME_BUTTON_LABEL.to_string(),
                    action: FRAME_BUTTON_ACTION.to_string(),
                    target: format!("{}?action=view", urls.profile_url(username)),
                }],
            },
        },
        title,
    }
}

/// Mini-app launch descriptor, carried as JSON in the profile page's
/// `fc:frame` meta tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniAppEmbed {
    pub version: String,
    pub image_url: String,
    pub button: EmbedButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedButton {
    pub title: String,
    pub action: EmbedAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub name: String,
    pub url: String,
    pub splash_image_url: String,
    pub splash_background_color: String,
}

impl MiniAppEmbed {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[must_use]
pub fn compose_miniapp_embed(urls: &SiteUrls, username: &str) -> MiniAppEmbed {
    MiniAppEmbed {
        version: EMBED_VERSION.to_string(),
        image_url: urls.default_preview_image_url(),
        button: EmbedButton {
            title: EMBED_BUTTON_TITLE.to_string(),
            action: EmbedAction {
                action_type: EMBED_ACTION_TYPE.to_string(),
                name: APP_NAME.to_string(),
                url: urls.profile_url(username),
                splash_image_url: urls.splash_image_url(),
                splash_background_color: SPLASH_BACKGROUND.to_string(),
            },
        },
    }
}

/// `<head>` metadata of a profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePageMeta {
    pub title: String,
    pub description: String,
    /// Shared text shown in link previews; differs from `description`.
    pub og_description: String,
    pub image_url: String,
    pub embed: MiniAppEmbed,
}

impl ProfilePageMeta {
    /// `(property, content)` pairs for the page's `<meta>` tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the embed cannot be serialized.
    pub fn meta_tags(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("description", self.description.clone()),
            ("og:title", self.title.clone()),
            ("og:description", self.og_description.clone()),
            ("og:image", self.image_url.clone()),
            ("fc:frame", self.embed.to_json()?),
        ])
    }
}

/// Metadata for `/profile/{username}`. `image_url` is the card to preview,
/// or `None` for the site's static preview image.
#[must_use]
pub fn compose_profile_page_meta(
    urls: &SiteUrls,
    username: &str,
    image_url: Option<String>,
) -> ProfilePageMeta {
    ProfilePageMeta {
        title: format!("{username}'s Activity Card"),
        description: format!("Check {username}'s Farcaster engagement stats on Activity Tracker"),
        og_description: OG_DESCRIPTION.to_string(),
        image_url: image_url.unwrap_or_else(|| urls.default_preview_image_url()),
        embed: compose_miniapp_embed(urls, username),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> SiteUrls {
        SiteUrls::new("https://activity-tracker.online")
    }

    #[test]
    fn frame_metadata_texts() {
        let meta = compose_frame_metadata(&urls(), "alice", "42");
        assert_eq!(meta.title, "alice's Activity Card");
        assert_eq!(meta.description, "Check alice's Farcaster engagement score: 42");
        assert_eq!(meta.og.title, meta.title);
        assert_eq!(meta.og.description, OG_DESCRIPTION);
        assert_eq!(meta.og.image, meta.fc.frame.image_url);
    }

    #[test]
    fn frame_image_url_carries_query() {
        let meta = compose_frame_metadata(&urls(), "alice", "42");
        let image = &meta.fc.frame.image_url;
        assert!(image.contains("username=alice"));
        assert!(image.contains("score=42"));
    }

    #[test]
    fn frame_button_targets_profile_view() {
        let meta = compose_frame_metadata(&urls(), "alice", "42");
        let button = &meta.fc.frame.buttons[0];
        assert_eq!(button.label, "View Full Stats");
        assert_eq!(button.action, "post");
        assert_eq!(
            button.target,
            "https://activity-tracker.online/profile/alice?action=view"
        );
    }

    #[test]
    fn frame_metadata_json_shape() {
        let meta = compose_frame_metadata(&urls(), "alice", "42");
        let json = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(json["fc"]["frame"]["version"], "1.0");
        assert!(json["fc"]["frame"]["imageUrl"].is_string());
        assert_eq!(json["fc"]["frame"]["buttons"][0]["label"], "View Full Stats");
        assert_eq!(json["og"]["title"], "alice's Activity Card");
    }

    #[test]
    fn flat_pairs_number_buttons() {
        let pairs = compose_frame_metadata(&urls(), "bob", "7").to_flat_pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("og:title"), Some("bob's Activity Card"));
        assert_eq!(get("fc:frame"), Some("1.0"));
        assert_eq!(get("fc:frame:button:1"), Some("View Full Stats"));
        assert_eq!(get("fc:frame:button:1:action"), Some("post"));
        assert!(get("fc:frame:image").is_some_and(|v| v.contains("username=bob")));
        assert_eq!(get("fc:frame:button:2"), None);
    }

    #[test]
    fn miniapp_embed_json_shape() {
        let embed = compose_miniapp_embed(&urls(), "alice");
        let json: serde_json::Value =
            serde_json::from_str(&embed.to_json().expect("json")).expect("parse");
        assert_eq!(json["version"], "next");
        assert_eq!(json["imageUrl"], "https://activity-tracker.online/og-image.jpg");
        assert_eq!(json["button"]["title"], "View Stats");
        assert_eq!(json["button"]["action"]["type"], "launch_miniapp");
        assert_eq!(json["button"]["action"]["name"], "Activity Tracker");
        assert_eq!(
            json["button"]["action"]["url"],
            "https://activity-tracker.online/profile/alice"
        );
        assert_eq!(
            json["button"]["action"]["splashImageUrl"],
            "https://activity-tracker.online/icon.png"
        );
        assert_eq!(json["button"]["action"]["splashBackgroundColor"], "#0a1628");
    }

    #[test]
    fn profile_page_meta_prefers_card_image() {
        let meta = compose_profile_page_meta(&urls(), "alice", Some("https://c/x.png".into()));
        assert_eq!(meta.image_url, "https://c/x.png");
        assert_eq!(
            meta.description,
            "Check alice's Farcaster engagement stats on Activity Tracker"
        );

        let tags = meta.meta_tags().expect("tags");
        let frame = tags.iter().find(|(k, _)| *k == "fc:frame").expect("fc:frame");
        assert!(frame.1.contains("\"launch_miniapp\""));
    }

    #[test]
    fn profile_page_og_description_is_the_shared_preview_text() {
        let meta = compose_profile_page_meta(&urls(), "alice", None);
        let tags = meta.meta_tags().expect("tags");
        let get = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());

        assert_eq!(get("og:description"), Some(OG_DESCRIPTION));
        assert_eq!(
            get("description"),
            Some("Check alice's Farcaster engagement stats on Activity Tracker")
        );
        assert_eq!(
            get("og:description"),
            Some(compose_frame_metadata(&urls(), "alice", "1").og.description.as_str())
        );
    }

    #[test]
    fn profile_page_meta_falls_back_to_static_image() {
        let meta = compose_profile_page_meta(&urls(), "alice", None);
        assert_eq!(meta.image_url, "https://activity-tracker.online/og-image.jpg");
    }
}
