use serde::{Deserialize, Serialize};

/// Public profile of a Farcaster account, as returned by the social-graph
/// provider. Re-fetched on every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Farcaster id (`fid`).
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Handle with a leading `@`.
    #[must_use]
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

/// Engagement counters for a single cast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cast {
    pub like_count: u64,
    pub recast_count: u64,
    pub reply_count: u64,
    /// Accounts that liked or recast this cast, one entry per reaction.
    /// Empty when the provider does not report reactors.
    #[serde(default)]
    pub engagers: Vec<EngagerRef>,
}

impl Cast {
    #[must_use]
    pub fn new(like_count: u64, recast_count: u64, reply_count: u64) -> Self {
        Self {
            like_count,
            recast_count,
            reply_count,
            engagers: Vec::new(),
        }
    }

    /// Sum of all interaction counters on this cast.
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.like_count
            .saturating_add(self.recast_count)
            .saturating_add(self.reply_count)
    }
}

/// A user who reacted to a cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagerRef {
    pub fid: u64,
    pub username: String,
}

/// Another account ranked by how often it engaged with a user's casts.
///
/// Ranking only knows the reactor's fid and username; display name and
/// avatar are filled in afterwards from the engager's profile, when it can
/// be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopEngager {
    pub fid: u64,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub engagement_score: u64,
    /// 1-based, unique within a ranking.
    pub rank: u32,
}
