//! Summary statistics over a user's recent casts.
//!
//! The engagement rate is an average per cast:
//! `(likes + recasts + replies) / max(cast_count, 1)`. An empty cast set
//! therefore reports `0.0` instead of dividing by zero.
//!
//! Display values are rounded half away from zero in both forms:
//! [`EngagementStats::headline_score`] to a whole number and
//! [`EngagementStats::detailed_rate`] to two decimals.

use serde::{Deserialize, Serialize};

use crate::profile::Cast;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementStats {
    pub cast_count: usize,
    pub total_likes: u64,
    pub total_recasts: u64,
    pub total_replies: u64,
    pub engagement_rate: f64,
}

impl EngagementStats {
    /// Sum of the three totals.
    #[must_use]
    pub fn total_interactions(&self) -> u64 {
        self.total_likes
            .saturating_add(self.total_recasts)
            .saturating_add(self.total_replies)
    }

    /// Engagement rate rounded to the nearest whole number, used on the card,
    /// in link previews and in share text.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn headline_score(&self) -> u64 {
        // engagement_rate is never negative or NaN; `as` saturates on overflow.
        self.engagement_rate.round() as u64
    }

    /// Engagement rate rounded to two decimals.
    #[must_use]
    pub fn detailed_rate(&self) -> f64 {
        (self.engagement_rate * 100.0).round() / 100.0
    }

    /// [`Self::detailed_rate`] formatted with exactly two fraction digits.
    #[must_use]
    pub fn detailed_rate_label(&self) -> String {
        format!("{:.2}", self.detailed_rate())
    }
}

/// Aggregate likes, recasts and replies over `casts`.
///
/// Pure and order-independent.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(casts: &[Cast]) -> EngagementStats {
    let (total_likes, total_recasts, total_replies) =
        casts.iter().fold((0u64, 0u64, 0u64), |(l, rc, rp), cast| {
            (
                l.saturating_add(cast.like_count),
                rc.saturating_add(cast.recast_count),
                rp.saturating_add(cast.reply_count),
            )
        });

    let total = total_likes
        .saturating_add(total_recasts)
        .saturating_add(total_replies);
    let divisor = casts.len().max(1);

    EngagementStats {
        cast_count: casts.len(),
        total_likes,
        total_recasts,
        total_replies,
        engagement_rate: total as f64 / divisor as f64,
    }
}
