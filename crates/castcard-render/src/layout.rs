//! Card layout, expressed once as an SVG document.
//!
//! Both backends consume [`compose_svg`]: the raster backend feeds it to
//! resvg, the SVG backend hands it to the browser unchanged. Geometry is in
//! card pixels (500×650).

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::{handle_for, AvatarSource, CardModel, EngagerRow, CARD_HEIGHT, CARD_WIDTH};

const FONT_STACK: &str = "Inter, 'DejaVu Sans', 'Liberation Sans', Arial, sans-serif";

const MAIN_AVATAR_CX: u32 = 250;
const MAIN_AVATAR_CY: u32 = 84;
const MAIN_AVATAR_R: u32 = 44;

const PANEL_TOP: u32 = 326;
const ROWS_TOP: u32 = 358;
const ROW_PITCH: u32 = 50;
const ROW_HEIGHT: u32 = 44;

const MEDAL_COLORS: [&str; 3] = ["#eab308", "#94a3b8", "#c2410c"];
const FALLBACK_BADGE_COLOR: &str = "#7c3aed";

/// Render `model` into a standalone SVG document.
#[must_use]
pub fn compose_svg(model: &CardModel) -> String {
    let mut svg = String::with_capacity(16 * 1024);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}" font-family="{FONT_STACK}">"#
    );

    let rows = model.visible_engagers();
    write_defs(&mut svg, rows.len());

    // Orange frame with the purple gradient panel inset by 12px.
    let _ = write!(
        svg,
        r#"<rect width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="url(#frame)"/><rect x="12" y="12" width="476" height="512" rx="24" fill="url(#panel)"/>"#
    );

    write_profile(&mut svg, model);
    write_engagers(&mut svg, &rows);
    write_footer(&mut svg);

    svg.push_str("</svg>");
    svg
}

fn write_defs(svg: &mut String, engager_rows: usize) {
    svg.push_str(concat!(
        "<defs>",
        r##"<linearGradient id="frame" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#f97316"/><stop offset="1" stop-color="#fb923c"/></linearGradient>"##,
        r##"<linearGradient id="panel" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#a78bfa"/><stop offset="0.5" stop-color="#d8b4fe"/><stop offset="1" stop-color="#f472b6"/></linearGradient>"##,
        r##"<linearGradient id="placeholder" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#c4b5fd"/><stop offset="1" stop-color="#7c3aed"/></linearGradient>"##,
    ));
    let _ = write!(
        svg,
        r#"<clipPath id="avatar-clip"><circle cx="{MAIN_AVATAR_CX}" cy="{MAIN_AVATAR_CY}" r="{MAIN_AVATAR_R}"/></clipPath>"#
    );
    for index in 0..engager_rows {
        let cy = row_top(index) + ROW_HEIGHT / 2;
        let _ = write!(
            svg,
            r#"<clipPath id="engager-clip-{index}"><circle cx="112" cy="{cy}" r="15"/></clipPath>"#
        );
    }
    svg.push_str("</defs>");
}

fn write_profile(svg: &mut String, model: &CardModel) {
    let _ = write!(
        svg,
        r##"<circle cx="{MAIN_AVATAR_CX}" cy="{MAIN_AVATAR_CY}" r="{}" fill="#ffffff"/>"##,
        MAIN_AVATAR_R + 4
    );
    write_avatar(
        svg,
        &model.avatar,
        &model.display_name,
        MAIN_AVATAR_CX,
        MAIN_AVATAR_CY,
        MAIN_AVATAR_R,
        "avatar-clip",
    );

    let name = encode_text(&truncate_chars(&model.display_name, 24)).into_owned();
    let handle = encode_text(&truncate_chars(&model.handle(), 30)).into_owned();
    let score = encode_text(&truncate_chars(&model.engagement_score, 8)).into_owned();

    let _ = write!(
        svg,
        concat!(
            r##"<text x="250" y="170" font-size="28" font-weight="700" fill="#ffffff" text-anchor="middle">{name}</text>"##,
            r##"<text x="250" y="198" font-size="18" fill="#ffffff" fill-opacity="0.9" text-anchor="middle">{handle}</text>"##,
            r##"<text x="250" y="236" font-size="16" fill="#ffffff" fill-opacity="0.8" text-anchor="middle">Avg Engagement Score</text>"##,
            r##"<text x="250" y="306" font-size="72" font-weight="900" fill="#ffffff" text-anchor="middle">{score}</text>"##,
        ),
        name = name,
        handle = handle,
        score = score,
    );
}

fn write_engagers(svg: &mut String, rows: &[&EngagerRow]) {
    let _ = write!(
        svg,
        concat!(
            r##"<rect x="36" y="{top}" width="428" height="186" rx="16" fill="#ffffff" fill-opacity="0.25"/>"##,
            r##"<text x="52" y="{title_y}" font-size="12" font-weight="700" fill="#334155" letter-spacing="1">TOP ENGAGERS</text>"##,
        ),
        top = PANEL_TOP,
        title_y = PANEL_TOP + 22,
    );

    if rows.is_empty() {
        svg.push_str(
            r##"<text x="250" y="424" font-size="12" fill="#475569" text-anchor="middle">No engagement data available</text>"##,
        );
        return;
    }

    for (index, row) in rows.iter().enumerate() {
        let top = row_top(index);
        let mid = top + ROW_HEIGHT / 2;
        let badge_color = usize::try_from(row.rank)
            .ok()
            .and_then(|rank| rank.checked_sub(1))
            .and_then(|i| MEDAL_COLORS.get(i))
            .copied()
            .unwrap_or(FALLBACK_BADGE_COLOR);

        let _ = write!(
            svg,
            concat!(
                r##"<rect x="48" y="{top}" width="404" height="{height}" rx="10" fill="#ffffff" fill-opacity="0.5"/>"##,
                r##"<circle cx="72" cy="{mid}" r="14" fill="{badge}"/>"##,
                r##"<text x="72" y="{badge_y}" font-size="11" font-weight="700" fill="#ffffff" text-anchor="middle">#{rank}</text>"##,
            ),
            top = top,
            height = ROW_HEIGHT,
            mid = mid,
            badge = badge_color,
            badge_y = mid + 4,
            rank = row.rank,
        );

        write_avatar(
            svg,
            &row.avatar,
            &row.display_name,
            112,
            mid,
            15,
            &format!("engager-clip-{index}"),
        );

        let name = encode_text(&truncate_chars(&row.display_name, 22)).into_owned();
        let handle = encode_text(&truncate_chars(&handle_for(&row.username), 26)).into_owned();
        let _ = write!(
            svg,
            concat!(
                r##"<text x="136" y="{name_y}" font-size="12" font-weight="700" fill="#1e293b">{name}</text>"##,
                r##"<text x="136" y="{handle_y}" font-size="11" fill="#64748b">{handle}</text>"##,
                r##"<text x="440" y="{score_y}" font-size="14" font-weight="700" fill="#7c3aed" text-anchor="end">{score}</text>"##,
            ),
            name_y = top + 19,
            handle_y = top + 35,
            score_y = mid + 5,
            name = name,
            handle = handle,
            score = row.engagement_score,
        );
    }
}

fn write_footer(svg: &mut String) {
    svg.push_str(concat!(
        r##"<rect x="12" y="536" width="476" height="62" rx="16" fill="#334155"/>"##,
        r##"<text x="250" y="577" font-size="28" font-weight="700" fill="#ffffff" text-anchor="middle">check your score</text>"##,
        r##"<g fill="none" stroke="#334155" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"##,
    ));

    let y = 624;
    // reply, recast, like, share
    let icons = [
        format!("M157 {} h18 a3 3 0 0 1 3 3 v9 a3 3 0 0 1 -3 3 h-10 l-5 4 v-4 h-3 a3 3 0 0 1 -3 -3 v-9 a3 3 0 0 1 3 -3 z", y - 8),
        format!("M213 {} v-3 a3 3 0 0 1 3 -3 h12 m-3 -3 l3 3 l-3 3 M231 {} v3 a3 3 0 0 1 -3 3 h-12 m3 3 l-3 -3 l3 -3", y - 2, y + 2),
        format!("M278 {} l-8 -8 a4.5 4.5 0 0 1 8 -6 a4.5 4.5 0 0 1 8 6 z", y + 8),
        format!("M326 {} L342 {} M334 {} h8 v8", y + 8, y - 8, y - 8),
    ];
    for d in &icons {
        let _ = write!(svg, r#"<path d="{d}"/>"#);
    }
    svg.push_str("</g>");
}

/// Draws a circular avatar centred on (`cx`, `cy`): the image clipped to
/// `clip_id`, or a gradient disc with `owner`'s initial.
fn write_avatar(
    svg: &mut String,
    avatar: &AvatarSource,
    owner: &str,
    cx: u32,
    cy: u32,
    r: u32,
    clip_id: &str,
) {
    match avatar {
        AvatarSource::Image { data_uri } => {
            let href = encode_double_quoted_attribute(data_uri);
            let _ = write!(
                svg,
                r#"<image x="{x}" y="{y}" width="{size}" height="{size}" preserveAspectRatio="xMidYMid slice" clip-path="url(#{clip_id})" xlink:href="{href}"/>"#,
                x = cx - r,
                y = cy - r,
                size = r * 2,
            );
        }
        AvatarSource::Placeholder => {
            let font_size = r * 9 / 10;
            let initial = encode_text(&initial_of(owner)).into_owned();
            let _ = write!(
                svg,
                concat!(
                    r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="url(#placeholder)"/>"#,
                    r##"<text x="{cx}" y="{baseline}" font-size="{font_size}" font-weight="700" fill="#ffffff" text-anchor="middle">{initial}</text>"##,
                ),
                cx = cx,
                cy = cy,
                r = r,
                baseline = cy + font_size * 7 / 20,
                font_size = font_size,
                initial = initial,
            );
        }
    }
}

fn row_top(index: usize) -> u32 {
    // At most MAX_ENGAGER_ROWS rows, so the index always fits.
    ROWS_TOP + ROW_PITCH * u32::try_from(index).unwrap_or(0)
}

/// First alphanumeric character of `name`, uppercased; `?` if there is none.
fn initial_of(name: &str) -> String {
    name.trim_start_matches('@')
        .chars()
        .find(|c| c.is_alphanumeric())
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

/// Shortens `text` to at most `max` characters, ending in an ellipsis when cut.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use castcard_core::TopEngager;

    use super::*;
    use crate::model::CardInput;

    fn engager(rank: u32) -> TopEngager {
        TopEngager {
            fid: u64::from(rank),
            username: format!("fan{rank}"),
            display_name: format!("Fan {rank}"),
            avatar_url: None,
            engagement_score: u64::from(100 - rank),
            rank,
        }
    }

    fn model(top_engagers: Vec<TopEngager>) -> CardModel {
        CardModel::without_avatars(CardInput {
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            avatar_url: None,
            engagement_score: "42".to_string(),
            top_engagers,
        })
    }

    #[test]
    fn document_has_fixed_dimensions() {
        let svg = compose_svg(&model(vec![]));
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="500" height="650""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn shows_name_handle_and_score() {
        let svg = compose_svg(&model(vec![]));
        assert!(svg.contains(">Alice</text>"));
        assert!(svg.contains(">@alice</text>"));
        assert!(svg.contains(">42</text>"));
        assert!(svg.contains("Avg Engagement Score"));
        assert!(svg.contains("check your score"));
    }

    #[test]
    fn empty_engagers_render_placeholder_row() {
        let svg = compose_svg(&model(vec![]));
        assert!(svg.contains("No engagement data available"));
        assert!(!svg.contains("engager-clip-0"));
    }

    #[test]
    fn only_first_three_ranks_render_in_order() {
        let svg = compose_svg(&model(vec![
            engager(5),
            engager(3),
            engager(1),
            engager(4),
            engager(2),
        ]));
        let first = svg.find("@fan1").expect("rank 1 present");
        let second = svg.find("@fan2").expect("rank 2 present");
        let third = svg.find("@fan3").expect("rank 3 present");
        assert!(first < second && second < third);
        assert!(!svg.contains("@fan4"));
        assert!(!svg.contains("@fan5"));
        assert!(!svg.contains("No engagement data available"));
        assert!(svg.contains(">#1</text>"));
        assert!(!svg.contains(">#4</text>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut m = model(vec![]);
        m.display_name = "<script>alert(1)</script>".to_string();
        m.engagement_score = "1&2".to_string();
        let svg = compose_svg(&m);
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
        assert!(svg.contains("1&amp;2"));
    }

    #[test]
    fn existing_at_prefix_is_not_doubled() {
        let mut m = model(vec![]);
        m.username = "@alice".to_string();
        let svg = compose_svg(&m);
        assert!(svg.contains(">@alice</text>"));
        assert!(!svg.contains("@@alice"));
    }

    #[test]
    fn placeholder_avatar_draws_initial() {
        let mut m = model(vec![]);
        m.display_name = "zoe".to_string();
        let svg = compose_svg(&m);
        assert!(svg.contains(r#"fill="url(#placeholder)""#));
        assert!(svg.contains(">Z</text>"));
    }

    #[test]
    fn image_avatar_is_clipped_to_circle() {
        let mut m = model(vec![]);
        m.avatar = AvatarSource::Image {
            data_uri: "data:image/png;base64,AAAA".to_string(),
        };
        let svg = compose_svg(&m);
        assert!(svg.contains(r#"clip-path="url(#avatar-clip)""#));
        assert!(svg.contains(r#"xlink:href="data:image/png;base64,AAAA""#));
    }

    #[test]
    fn same_model_same_document() {
        let m = model(vec![engager(1), engager(2)]);
        assert_eq!(compose_svg(&m), compose_svg(&m));
    }

    #[test]
    fn truncate_chars_adds_ellipsis() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn initial_of_skips_symbols() {
        assert_eq!(initial_of("@bob"), "B");
        assert_eq!(initial_of("🔥"), "?");
        assert_eq!(initial_of(""), "?");
    }
}
