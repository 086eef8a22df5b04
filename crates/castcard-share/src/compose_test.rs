use std::cell::RefCell;

use castcard_core::{aggregate, Cast, UserProfile};

use super::*;

fn payload() -> SharePayload {
    let urls = SiteUrls::new("https://activity-tracker.online");
    let profile = UserProfile {
        id: 7,
        username: "alice".to_string(),
        display_name: "Alice".to_string(),
        avatar_url: Some("https://img.example/a.png".to_string()),
    };
    let stats = aggregate(&[Cast::new(3, 2, 1), Cast::new(1, 0, 1)]);
    SharePayload::new(&urls, &profile, &stats)
}

struct FakeHost {
    native: bool,
    fail: bool,
    shared: RefCell<Vec<NativeSharePayload>>,
}

impl FakeHost {
    fn new(native: bool, fail: bool) -> Self {
        Self {
            native,
            fail,
            shared: RefCell::new(Vec::new()),
        }
    }
}

impl HostCapabilities for FakeHost {
    fn can_native_share(&self) -> bool {
        self.native
    }

    fn native_share(&self, payload: &NativeSharePayload) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::NativeShare("user dismissed".to_string()));
        }
        self.shared.borrow_mut().push(payload.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FakeClipboard {
    fail: bool,
    written: RefCell<Option<String>>,
}

impl Clipboard for FakeClipboard {
    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::Clipboard("permission denied".to_string()));
        }
        *self.written.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

#[test]
fn payload_uses_headline_score_and_totals() {
    let p = payload();
    // (6 + 2) / 2 casts
    assert_eq!(p.engagement_score, 4);
    assert_eq!((p.total_likes, p.total_recasts, p.total_replies), (4, 2, 2));
    assert_eq!(p.profile_url, "https://activity-tracker.online/profile/alice");
    assert!(p.card_image_url.contains("username=alice&score=4"));
    assert!(p.card_image_url.contains("pfpUrl=https%3A%2F%2Fimg.example%2Fa.png"));
}

#[test]
fn share_text_mentions_score_and_handle() {
    let text = payload().share_text();
    assert!(text.starts_with("📊 Just checked my Farcaster engagement on Activity Tracker!\n\n"));
    assert!(text.contains("My engagement score: 4\n"));
    assert!(text.contains("Username: @alice\n"));
    assert!(text.contains("4 likes"));
    assert!(text.ends_with("Stay Based. 🟣\nBuilt on /base."));
}

#[test]
fn web_share_opens_encoded_intent_url() {
    let p = payload();
    let outcome = share(&p, ShareContext::Web);

    let ShareOutcome::OpenUrl(url) = outcome else {
        panic!("expected OpenUrl, got {outcome:?}");
    };
    assert!(url.starts_with("https://warpcast.com/~/compose?text="));
    assert!(url.contains(&encode_component(&p.share_text())));
    assert!(url.contains(&format!("&embeds[]={}", encode_component(&p.card_image_url))));
    assert!(url.ends_with(&format!("&embeds[]={}", encode_component(&p.profile_url))));
    assert!(!url.contains(' '));
}

#[test]
fn embedded_host_prefers_native_share() {
    let p = payload();
    let host = FakeHost::new(true, false);
    let clipboard = FakeClipboard::default();

    let outcome = share(
        &p,
        ShareContext::EmbeddedHost {
            host: &host,
            clipboard: &clipboard,
        },
    );

    assert_eq!(outcome, ShareOutcome::NativeShared);
    let shared = host.shared.borrow();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].image_url, p.card_image_url);
    assert!(clipboard.written.borrow().is_none());
}

#[test]
fn embedded_host_without_native_share_copies() {
    let p = payload();
    let host = FakeHost::new(false, false);
    let clipboard = FakeClipboard::default();

    let outcome = share(
        &p,
        ShareContext::EmbeddedHost {
            host: &host,
            clipboard: &clipboard,
        },
    );

    assert_eq!(
        outcome,
        ShareOutcome::CopiedToClipboard {
            confirmation: CLIPBOARD_CONFIRMATION
        }
    );
    assert_eq!(
        clipboard.written.borrow().as_deref(),
        Some(format!("{}\n\n{}", p.share_text(), p.card_image_url).as_str())
    );
}

#[test]
fn native_failure_falls_back_to_clipboard() {
    let host = FakeHost::new(true, true);
    let clipboard = FakeClipboard::default();

    let outcome = share(
        &payload(),
        ShareContext::EmbeddedHost {
            host: &host,
            clipboard: &clipboard,
        },
    );

    assert!(matches!(outcome, ShareOutcome::CopiedToClipboard { .. }));
    assert!(clipboard.written.borrow().is_some());
}

#[test]
fn all_paths_failing_is_noop() {
    let host = FakeHost::new(true, true);
    let clipboard = FakeClipboard {
        fail: true,
        ..FakeClipboard::default()
    };

    let outcome = share(
        &payload(),
        ShareContext::EmbeddedHost {
            host: &host,
            clipboard: &clipboard,
        },
    );

    assert_eq!(outcome, ShareOutcome::NoOp);
    assert!(!outcome.is_success());
}

#[test]
fn compose_intent_url_without_embeds() {
    assert_eq!(
        compose_intent_url("hi there", &[]),
        "https://warpcast.com/~/compose?text=hi%20there"
    );
}

#[test]
fn detect_context_signals() {
    assert_eq!(detect_context(&HostSignals::default()), DetectedContext::Web);
    assert_eq!(
        detect_context(&HostSignals {
            hostname: Some("app.BaseApp.xyz"),
            ..HostSignals::default()
        }),
        DetectedContext::EmbeddedHost
    );
    assert_eq!(
        detect_context(&HostSignals {
            user_agent: Some("Mozilla/5.0 BaseApp/1.2"),
            ..HostSignals::default()
        }),
        DetectedContext::EmbeddedHost
    );
    assert_eq!(
        detect_context(&HostSignals {
            user_agent: Some("Mozilla/5.0 baseapp"),
            ..HostSignals::default()
        }),
        DetectedContext::Web
    );
    assert_eq!(
        detect_context(&HostSignals {
            host_object_present: true,
            ..HostSignals::default()
        }),
        DetectedContext::EmbeddedHost
    );
}
