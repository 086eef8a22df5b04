use castcard_core::{
    aggregate, apply_engager_profiles, rank_top_engagers, EngagementStats, TopEngager,
    UserProfile,
};

use crate::error::NeynarError;
use crate::graph::SocialGraph;

/// Number of top engagers kept on a snapshot; the card shows at most this many.
pub const TOP_ENGAGER_LIMIT: usize = 3;

/// Everything a card, preview or share payload needs about one user.
#[derive(Debug, Clone)]
pub struct ActivitySnapshot {
    pub profile: UserProfile,
    pub stats: EngagementStats,
    pub top_engagers: Vec<TopEngager>,
}

/// Fetch `username`'s profile, then their last `cast_window` casts, and
/// aggregate them.
///
/// The two calls run sequentially because the cast lookup needs the fid.
/// Either failure is terminal; no partial snapshot is returned. The top
/// engagers' profiles are fetched afterwards on a best-effort basis: if that
/// lookup fails they keep their usernames and placeholder avatars.
///
/// # Errors
///
/// Propagates the [`NeynarError`] of whichever lookup failed.
pub async fn fetch_activity<G>(
    graph: &G,
    username: &str,
    cast_window: u32,
) -> Result<ActivitySnapshot, NeynarError>
where
    G: SocialGraph + ?Sized,
{
    let profile = graph.profile_by_username(username).await?;
    let casts = graph.recent_casts(profile.id, cast_window).await?;

    let stats = aggregate(&casts);
    let mut top_engagers = rank_top_engagers(&casts, TOP_ENGAGER_LIMIT);
    if !top_engagers.is_empty() {
        let fids: Vec<u64> = top_engagers.iter().map(|e| e.fid).collect();
        match graph.profiles_by_fid(&fids).await {
            Ok(profiles) => apply_engager_profiles(&mut top_engagers, &profiles),
            Err(e) => {
                tracing::warn!(
                    username = %profile.username,
                    error = %e,
                    "top engager profiles unavailable; using usernames"
                );
            }
        }
    }

    tracing::info!(
        username = %profile.username,
        fid = profile.id,
        casts = stats.cast_count,
        engagement_rate = stats.engagement_rate,
        "activity snapshot computed"
    );

    Ok(ActivitySnapshot {
        profile,
        stats,
        top_engagers,
    })
}
