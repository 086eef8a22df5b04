use async_trait::async_trait;
use castcard_core::{Cast, UserProfile};

use crate::error::NeynarError;

/// Read-only view of the social graph castcard depends on.
///
/// [`crate::NeynarClient`] is the production implementation; tests and the
/// HTTP layer can substitute any other source of profiles and casts.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Public profile for `username`.
    async fn profile_by_username(&self, username: &str) -> Result<UserProfile, NeynarError>;

    /// Up to `limit` of the most recent casts authored by `fid`.
    async fn recent_casts(&self, fid: u64, limit: u32) -> Result<Vec<Cast>, NeynarError>;

    /// Profiles for `fids`. Unknown fids are left out of the result.
    async fn profiles_by_fid(&self, fids: &[u64]) -> Result<Vec<UserProfile>, NeynarError>;
}
