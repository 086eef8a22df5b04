//! Command handlers. Output goes to stdout; logs go to stderr.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use castcard_core::AppConfig;
use castcard_neynar::{fetch_activity, ActivitySnapshot, SocialGraph};
use castcard_render::{AvatarLoader, CardBackend, CardInput, RasterBackend, SvgBackend};
use castcard_share::{
    compose_frame_metadata, Clipboard, FrameMetadata, HostCapabilities, NativeSharePayload,
    ShareContext, ShareError, ShareOutcome, SharePayload, ShareSession, SiteUrls,
};

use crate::CardFormat;

pub(crate) async fn run_stats<G>(graph: &G, username: &str, cast_window: u32) -> anyhow::Result<()>
where
    G: SocialGraph + ?Sized,
{
    let snapshot = fetch_activity(graph, username, cast_window).await?;
    print!("{}", format_stats(&snapshot));
    Ok(())
}

/// Renders `username`'s card to `out`.
///
/// # Errors
///
/// Returns an error if the lookup or render fails or `out` cannot be written.
pub(crate) async fn run_card<G>(
    graph: &G,
    config: &AppConfig,
    username: &str,
    out: &Path,
    format: CardFormat,
    no_avatars: bool,
) -> anyhow::Result<()>
where
    G: SocialGraph + ?Sized,
{
    let snapshot = fetch_activity(graph, username, config.cast_window).await?;

    let loader = if no_avatars {
        AvatarLoader::disabled()
    } else {
        AvatarLoader::new(config.request_timeout_secs, &config.user_agent)?
    };
    let model = loader.resolve(card_input(&snapshot)).await;

    let card = match format {
        CardFormat::Png => RasterBackend::new(config.font_path.as_deref())?.render(&model)?,
        CardFormat::Svg => SvgBackend.render(&model)?,
    };

    std::fs::write(out, &card.bytes)
        .with_context(|| format!("failed to write card to {}", out.display()))?;
    tracing::info!(
        username = %snapshot.profile.username,
        path = %out.display(),
        bytes = card.bytes.len(),
        "card written"
    );
    println!("{}", out.display());
    Ok(())
}

pub(crate) async fn run_share<G>(
    graph: &G,
    urls: &SiteUrls,
    username: &str,
    clipboard: bool,
    cast_window: u32,
) -> anyhow::Result<()>
where
    G: SocialGraph + ?Sized,
{
    let snapshot = fetch_activity(graph, username, cast_window).await?;
    let payload = SharePayload::new(urls, &snapshot.profile, &snapshot.stats);

    let shared = share_from_terminal(&payload, clipboard)?;
    println!("{}", shared.output);
    if let Some(confirmation) = shared.confirmation {
        eprintln!("{confirmation}");
    }
    Ok(())
}

/// What a terminal share produced.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TerminalShare {
    /// Compose URL, or the text that would go to the clipboard.
    pub output: String,
    pub confirmation: Option<&'static str>,
}

/// A terminal is a host with no native share.
struct TerminalHost;

impl HostCapabilities for TerminalHost {
    fn can_native_share(&self) -> bool {
        false
    }

    fn native_share(&self, _payload: &NativeSharePayload) -> Result<(), ShareError> {
        Err(ShareError::NativeShare(
            "terminal has no native share".to_string(),
        ))
    }
}

/// Captures the clipboard text so it can be printed.
#[derive(Default)]
struct CapturedClipboard(RefCell<Option<String>>);

impl Clipboard for CapturedClipboard {
    fn write_text(&self, text: &str) -> Result<(), ShareError> {
        *self.0.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Runs one share session for `payload`, either as the open web (compose
/// URL) or as an embedded host that falls back to the clipboard.
pub(crate) fn share_from_terminal(
    payload: &SharePayload,
    clipboard: bool,
) -> anyhow::Result<TerminalShare> {
    let mut session = ShareSession::new();

    if !clipboard {
        return match session.run(payload, ShareContext::Web)? {
            ShareOutcome::OpenUrl(url) => Ok(TerminalShare {
                output: url,
                confirmation: None,
            }),
            other => anyhow::bail!("unexpected share outcome: {other:?}"),
        };
    }

    let captured = CapturedClipboard::default();
    let context = ShareContext::EmbeddedHost {
        host: &TerminalHost,
        clipboard: &captured,
    };
    let outcome = session.run(payload, context)?;
    match (outcome, captured.0.into_inner()) {
        (ShareOutcome::CopiedToClipboard { confirmation }, Some(text)) => Ok(TerminalShare {
            output: text,
            confirmation: Some(confirmation),
        }),
        (other, _) => anyhow::bail!("share did not reach the clipboard: {other:?}"),
    }
}

/// Prints the frame metadata. Without `score`, the user's activity is
/// fetched to compute it.
pub(crate) async fn run_metadata<G>(
    graph: &G,
    urls: &SiteUrls,
    username: &str,
    score: Option<String>,
    flat: bool,
    cast_window: u32,
) -> anyhow::Result<()>
where
    G: SocialGraph + ?Sized,
{
    let score = match score {
        Some(score) => score,
        None => fetch_activity(graph, username, cast_window)
            .await?
            .stats
            .headline_score()
            .to_string(),
    };

    let meta = compose_frame_metadata(urls, username, &score);
    if flat {
        print!("{}", format_flat_metadata(&meta));
    } else {
        println!("{}", serde_json::to_string_pretty(&meta)?);
    }
    Ok(())
}

/// One `name<TAB>content` line per `<meta>` tag.
pub(crate) fn format_flat_metadata(meta: &FrameMetadata) -> String {
    let mut out = String::new();
    for (name, content) in meta.to_flat_pairs() {
        let _ = writeln!(out, "{name}\t{content}");
    }
    out
}

pub(crate) fn card_input(snapshot: &ActivitySnapshot) -> CardInput {
    CardInput {
        username: snapshot.profile.username.clone(),
        display_name: snapshot.profile.display_name.clone(),
        avatar_url: snapshot.profile.avatar_url.clone(),
        engagement_score: snapshot.stats.headline_score().to_string(),
        top_engagers: snapshot.top_engagers.clone(),
    }
}

pub(crate) fn default_card_path(username: &str, format: CardFormat) -> PathBuf {
    let name: String = username
        .trim_start_matches('@')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    PathBuf::from(format!("activity-card-{name}.{}", format.extension()))
}

pub(crate) fn format_stats(snapshot: &ActivitySnapshot) -> String {
    let profile = &snapshot.profile;
    let stats = &snapshot.stats;

    let mut out = String::new();
    let _ = writeln!(out, "{} ({}) fid {}", profile.handle(), profile.display_name, profile.id);
    let _ = writeln!(out, "casts analysed:   {}", stats.cast_count);
    let _ = writeln!(out, "likes:            {}", stats.total_likes);
    let _ = writeln!(out, "recasts:          {}", stats.total_recasts);
    let _ = writeln!(out, "replies:          {}", stats.total_replies);
    let _ = writeln!(
        out,
        "engagement score: {} ({} per cast)",
        stats.headline_score(),
        stats.detailed_rate_label()
    );

    if snapshot.top_engagers.is_empty() {
        let _ = writeln!(out, "top engagers:     none");
    } else {
        let _ = writeln!(out, "top engagers:");
        for engager in &snapshot.top_engagers {
            let _ = writeln!(
                out,
                "  #{} @{} ({}) {}",
                engager.rank, engager.username, engager.display_name, engager.engagement_score
            );
        }
    }
    out
}
