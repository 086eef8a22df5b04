use castcard_core::TopEngager;

/// Output width of every card, in pixels.
pub const CARD_WIDTH: u32 = 500;
/// Output height of every card, in pixels.
pub const CARD_HEIGHT: u32 = 650;
/// Rows shown in the "Top Engagers" panel.
pub const MAX_ENGAGER_ROWS: usize = 3;

/// Card contents before avatars are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInput {
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Headline numeral, already formatted by the caller.
    pub engagement_score: String,
    pub top_engagers: Vec<TopEngager>,
}

/// Where an avatar's pixels come from once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    /// Inline `data:` URI holding the fetched image.
    Image { data_uri: String },
    /// Drawn circle with the owner's initial.
    Placeholder,
}

/// One row of the "Top Engagers" panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagerRow {
    pub rank: u32,
    pub username: String,
    pub display_name: String,
    pub engagement_score: u64,
    pub avatar: AvatarSource,
}

/// Fully resolved card. Rendering a `CardModel` performs no I/O, so equal
/// models always produce identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardModel {
    pub username: String,
    pub display_name: String,
    pub avatar: AvatarSource,
    pub engagement_score: String,
    pub top_engagers: Vec<EngagerRow>,
}

impl CardModel {
    /// Builds a model whose avatars are all placeholders.
    #[must_use]
    pub fn without_avatars(input: CardInput) -> Self {
        Self {
            username: input.username,
            display_name: input.display_name,
            avatar: AvatarSource::Placeholder,
            engagement_score: input.engagement_score,
            top_engagers: input
                .top_engagers
                .into_iter()
                .map(|e| EngagerRow {
                    rank: e.rank,
                    username: e.username,
                    display_name: e.display_name,
                    engagement_score: e.engagement_score,
                    avatar: AvatarSource::Placeholder,
                })
                .collect(),
        }
    }

    /// `@`-prefixed handle; an existing `@` is kept rather than doubled.
    #[must_use]
    pub fn handle(&self) -> String {
        handle_for(&self.username)
    }

    /// The engager rows the card shows: lowest ranks first, at most
    /// [`MAX_ENGAGER_ROWS`].
    #[must_use]
    pub fn visible_engagers(&self) -> Vec<&EngagerRow> {
        let mut rows: Vec<&EngagerRow> = self.top_engagers.iter().collect();
        rows.sort_by_key(|row| row.rank);
        rows.truncate(MAX_ENGAGER_ROWS);
        rows
    }
}

pub(crate) fn handle_for(username: &str) -> String {
    if username.starts_with('@') {
        username.to_string()
    } else {
        format!("@{username}")
    }
}
