//! Neynar v2 response shapes.
//!
//! Only the fields castcard reads are modelled; everything else in the
//! payload is ignored by serde.

use castcard_core::{Cast, EngagerRef, UserProfile};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// user/by_username, user/bulk
// ---------------------------------------------------------------------------

/// Envelope for `GET /v2/farcaster/user/by_username`: `{ "user": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub user: NeynarUser,
}

#[derive(Debug, Deserialize)]
pub struct NeynarUser {
    pub fid: u64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

impl From<NeynarUser> for UserProfile {
    fn from(user: NeynarUser) -> Self {
        let display_name = user
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| user.username.clone());
        UserProfile {
            id: user.fid,
            username: user.username,
            display_name,
            avatar_url: user.pfp_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Envelope for `GET /v2/farcaster/user/bulk`: `{ "users": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct BulkUsersResponse {
    #[serde(default)]
    pub users: Vec<NeynarUser>,
}

// ---------------------------------------------------------------------------
// feed/user/casts
// ---------------------------------------------------------------------------

/// Envelope for `GET /v2/farcaster/feed/user/casts`: `{ "casts": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct CastsResponse {
    #[serde(default)]
    pub casts: Vec<NeynarCast>,
}

#[derive(Debug, Deserialize)]
pub struct NeynarCast {
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default)]
    pub replies: Replies,
}

#[derive(Debug, Default, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub recasts_count: u64,
    /// Sample of accounts that liked the cast. Neynar truncates this list,
    /// so `likes_count` stays the authoritative total.
    #[serde(default)]
    pub likes: Vec<ReactionUser>,
    #[serde(default)]
    pub recasts: Vec<ReactionUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Replies {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReactionUser {
    pub fid: u64,
    #[serde(default)]
    pub fname: Option<String>,
}

impl From<NeynarCast> for Cast {
    fn from(cast: NeynarCast) -> Self {
        let Reactions {
            likes_count,
            recasts_count,
            likes,
            recasts,
        } = cast.reactions;

        // Reactors without an fname cannot be shown on a card.
        let engagers = likes
            .into_iter()
            .chain(recasts)
            .filter_map(|r| {
                let username = r.fname.filter(|n| !n.is_empty())?;
                Some(EngagerRef { fid: r.fid, username })
            })
            .collect();

        Cast {
            like_count: likes_count,
            recast_count: recasts_count,
            reply_count: cast.replies.count,
            engagers,
        }
    }
}
