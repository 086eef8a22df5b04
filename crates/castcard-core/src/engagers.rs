use std::collections::HashMap;

use crate::profile::{Cast, EngagerRef, TopEngager, UserProfile};

/// Rank the accounts that reacted to `casts`, most active first.
///
/// Every like or recast listed on a cast scores one point for the reacting
/// account. Ties are broken by username so the ranking is stable across
/// calls. At most `limit` entries are returned, ranked `1..=n`, with the
/// username standing in for the display name and no avatar.
#[must_use]
pub fn rank_top_engagers(casts: &[Cast], limit: usize) -> Vec<TopEngager> {
    let mut scores: HashMap<u64, (&EngagerRef, u64)> = HashMap::new();

    for engager in casts.iter().flat_map(|c| c.engagers.iter()) {
        scores.entry(engager.fid).or_insert((engager, 0)).1 += 1;
    }

    let mut ranked: Vec<(&EngagerRef, u64)> = scores.into_values().collect();
    ranked.sort_by(|(a, a_score), (b, b_score)| {
        b_score
            .cmp(a_score)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.fid.cmp(&b.fid))
    });

    ranked
        .into_iter()
        .take(limit)
        .zip(1u32..)
        .map(|((engager, score), rank)| TopEngager {
            fid: engager.fid,
            username: engager.username.clone(),
            display_name: engager.username.clone(),
            avatar_url: None,
            engagement_score: score,
            rank,
        })
        .collect()
}

/// Copies display name and avatar from `profiles` onto the engagers with a
/// matching fid. Engagers without a profile keep what they have; rank and
/// score never change.
pub fn apply_engager_profiles(engagers: &mut [TopEngager], profiles: &[UserProfile]) {
    let by_fid: HashMap<u64, &UserProfile> = profiles.iter().map(|p| (p.id, p)).collect();

    for engager in engagers {
        let Some(profile) = by_fid.get(&engager.fid) else {
            continue;
        };
        if !profile.display_name.trim().is_empty() {
            engager.display_name.clone_from(&profile.display_name);
        }
        if profile.avatar_url.is_some() {
            engager.avatar_url.clone_from(&profile.avatar_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engager(fid: u64, username: &str) -> EngagerRef {
        EngagerRef {
            fid,
            username: username.to_string(),
        }
    }

    fn cast_with(engagers: Vec<EngagerRef>) -> Cast {
        Cast {
            like_count: engagers.len() as u64,
            recast_count: 0,
            reply_count: 0,
            engagers,
        }
    }

    fn profile(fid: u64, username: &str, display_name: &str, avatar: Option<&str>) -> UserProfile {
        UserProfile {
            id: fid,
            username: username.to_string(),
            display_name: display_name.to_string(),
            avatar_url: avatar.map(str::to_string),
        }
    }

    #[test]
    fn no_reactions_yields_empty_ranking() {
        assert!(rank_top_engagers(&[Cast::new(4, 2, 1)], 3).is_empty());
        assert!(rank_top_engagers(&[], 3).is_empty());
    }

    #[test]
    fn ranks_by_reaction_count_descending() {
        let casts = vec![
            cast_with(vec![engager(1, "carol"), engager(2, "bob")]),
            cast_with(vec![engager(2, "bob"), engager(3, "dave")]),
            cast_with(vec![engager(2, "bob"), engager(1, "carol")]),
        ];

        let ranked = rank_top_engagers(&casts, 3);
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["bob", "carol", "dave"]);
        assert_eq!(ranked[0].fid, 2);
        assert_eq!(ranked[0].engagement_score, 3);
        assert_eq!(ranked[1].engagement_score, 2);
        assert_eq!(ranked[2].engagement_score, 1);
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
    }

    #[test]
    fn ties_break_by_username() {
        let casts = vec![cast_with(vec![
            engager(9, "zed"),
            engager(4, "amy"),
            engager(7, "mia"),
        ])];
        let ranked = rank_top_engagers(&casts, 10);
        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["amy", "mia", "zed"]);
    }

    #[test]
    fn limit_truncates_ranking() {
        let casts = vec![cast_with((1..=6).map(|i| engager(i, &format!("u{i}"))).collect())];
        let ranked = rank_top_engagers(&casts, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked.last().map(|e| e.rank), Some(3));
    }

    #[test]
    fn ranking_starts_with_username_and_no_avatar() {
        let ranked = rank_top_engagers(&[cast_with(vec![engager(6, "finn")])], 3);
        assert_eq!(ranked[0].display_name, "finn");
        assert_eq!(ranked[0].avatar_url, None);
    }

    #[test]
    fn profiles_fill_display_name_and_avatar_by_fid() {
        let casts = vec![cast_with(vec![
            engager(5, "erin"),
            engager(5, "erin"),
            engager(6, "finn"),
        ])];
        let mut ranked = rank_top_engagers(&casts, 3);

        apply_engager_profiles(
            &mut ranked,
            &[
                profile(6, "finn", "Finn F.", None),
                profile(5, "erin", "Erin E.", Some("https://img.example/erin.png")),
                profile(99, "stranger", "Stranger", Some("https://img.example/x.png")),
            ],
        );

        assert_eq!(ranked[0].display_name, "Erin E.");
        assert_eq!(
            ranked[0].avatar_url.as_deref(),
            Some("https://img.example/erin.png")
        );
        assert_eq!(ranked[1].display_name, "Finn F.");
        assert_eq!(ranked[1].avatar_url, None);
        assert_eq!(ranked[0].engagement_score, 2);
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn missing_profiles_leave_ranking_untouched() {
        let mut ranked = rank_top_engagers(&[cast_with(vec![engager(6, "finn")])], 3);
        let before = ranked.clone();
        apply_engager_profiles(&mut ranked, &[]);
        assert_eq!(ranked, before);

        apply_engager_profiles(&mut ranked, &[profile(6, "finn", "  ", None)]);
        assert_eq!(ranked[0].display_name, "finn");
    }
}
