use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::{Banner, Catalog, BRAND_NAME};
use crate::models::document::{Block, GeneratedDocument, HeadingLevel, ResolvedLink};
use crate::models::trip::{Intent, TripParameters};

/// Cost-category labels promoted to `CostLine` blocks.
const COST_LABELS: [&str; 5] = [
    "Accommodation:",
    "Dining:",
    "Activities:",
    "Spa:",
    "Miscellaneous:",
];

/// Getaway documents never carry more than 3 banner slots, one directly
/// after each option header. Itineraries get exactly one slot under the
/// title.
const MAX_GETAWAY_BANNERS: usize = 3;

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("static regex"))
}

fn option_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\*{0,2}Option \d+:").expect("static regex"))
}

/// Escapes the rendering markup's reserved characters.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes reserved characters, then converts markdown bold to `<b>` spans.
/// Escaping must happen first so the converted bold markup itself is not
/// escaped.
pub fn clean_text(text: &str) -> String {
    let escaped = escape_markup(text);
    bold_re()
        .replace_all(&escaped, "<b>$1</b>")
        .trim()
        .to_string()
}

fn is_option_header(line: &str) -> bool {
    option_re().is_match(line)
}

fn is_day_header(line: &str) -> bool {
    let stripped = line.trim_start_matches('*').trim_start();
    match stripped.strip_prefix("Day ") {
        Some(rest) => rest.chars().next().is_some_and(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn is_cost_line(line: &str) -> bool {
    COST_LABELS.iter().any(|label| line.contains(label))
}

fn is_estimate_or_total(line: &str) -> bool {
    let stripped = line.trim_start_matches('*');
    stripped.starts_with("Estimated") || stripped.starts_with("Total")
}

fn ensure_bold(markup: String) -> String {
    if markup.contains("<b>") {
        markup
    } else {
        format!("<b>{}</b>", markup)
    }
}

/// Classifies each non-blank line of generated text into a content block.
/// Precedence: option header, day header, cost line, estimate/total
/// sub-heading, body text.
pub fn segment(text: &str, links: &[ResolvedLink]) -> Vec<Block> {
    let mut blocks = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_option_header(trimmed) {
            let link = links
                .iter()
                .find(|l| trimmed.contains(&l.name))
                .map(|l| l.link.clone());
            blocks.push(Block::OptionHeader {
                markup: ensure_bold(clean_text(trimmed)),
                link,
            });
        } else if is_day_header(trimmed) {
            blocks.push(Block::DayHeader {
                markup: ensure_bold(clean_text(trimmed)),
            });
        } else if is_cost_line(trimmed) {
            blocks.push(Block::CostLine {
                markup: clean_text(trimmed),
            });
        } else if is_estimate_or_total(trimmed) {
            blocks.push(Block::Heading {
                markup: clean_text(&trimmed.replace('*', "")),
                level: HeadingLevel::Section,
            });
        } else if let Some(item) = trimmed.strip_prefix("- ") {
            blocks.push(Block::BodyText {
                markup: format!("\u{2022} {}", clean_text(item)),
            });
        } else {
            blocks.push(Block::BodyText {
                markup: clean_text(trimmed),
            });
        }
    }

    blocks
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Getaway subtitle composition order is fixed for output stability:
/// "{days}-Day", title-cased climate, slash-joined title-cased first two
/// activities, "Getaway", "for {travelers}".
fn getaway_subtitle(params: &TripParameters) -> String {
    let mut parts = vec![format!("{}-Day", params.number_of_days)];

    if let Some(climate) = &params.climate_preferences {
        parts.push(title_case(climate));
    }
    if let Some(activities) = &params.preferred_activities {
        let pair = activities
            .iter()
            .take(2)
            .map(|a| title_case(a))
            .collect::<Vec<_>>()
            .join("/");
        if !pair.is_empty() {
            parts.push(pair);
        }
    }

    parts.push("Getaway".to_string());
    parts.push(format!("for {}", params.family_size));
    parts.join(" ")
}

fn itinerary_subtitle(params: &TripParameters) -> String {
    format!(
        "{} - {} Days",
        params.destination.join(", "),
        params.number_of_days
    )
}

/// Inserts one banner slot directly after each option header, cycling the
/// fixed creatives by position and capping at 3 regardless of how many
/// options the model produced.
fn interleave_getaway_banners(content: Vec<Block>, banners: &[Banner]) -> Vec<Block> {
    if banners.is_empty() {
        return content;
    }

    let mut blocks = Vec::with_capacity(content.len() + MAX_GETAWAY_BANNERS);
    let mut banner_idx = 0usize;

    for block in content {
        let is_option = matches!(block, Block::OptionHeader { .. });
        blocks.push(block);
        if is_option && banner_idx < MAX_GETAWAY_BANNERS {
            blocks.push(Block::BannerSlot {
                banner: banner_idx % banners.len(),
            });
            banner_idx += 1;
        }
    }

    blocks
}

/// Builds the full document layout: brand and title headings, the banner
/// policy for the intent, the segmented content, and the booking-links
/// footer. Deterministic: identical inputs produce identical block
/// sequences.
pub fn assemble(
    text: &str,
    params: &TripParameters,
    intent: Intent,
    links: &[ResolvedLink],
    banners: &[Banner],
    catalog: &Catalog,
) -> GeneratedDocument {
    let mut blocks = vec![Block::Heading {
        markup: BRAND_NAME.to_string(),
        level: HeadingLevel::Brand,
    }];

    let (title, subtitle) = match intent {
        Intent::Getaway => ("Luxury Getaway Recommendations", getaway_subtitle(params)),
        _ => ("Luxury Travel Itinerary", itinerary_subtitle(params)),
    };
    blocks.push(Block::Heading {
        markup: title.to_string(),
        level: HeadingLevel::Title,
    });

    // Itineraries are one continuous narrative: a single ad under the title,
    // never repeated per day.
    if intent != Intent::Getaway && !banners.is_empty() {
        blocks.push(Block::BannerSlot { banner: 0 });
    }

    blocks.push(Block::Heading {
        markup: subtitle,
        level: HeadingLevel::Section,
    });
    blocks.push(Block::BodyText {
        markup: format!(
            "<b>Budget:</b> {} | <b>Travelers:</b> {}",
            escape_markup(&params.budget),
            params.family_size
        ),
    });

    let content = segment(text, links);
    if intent == Intent::Getaway {
        blocks.extend(interleave_getaway_banners(content, banners));
    } else {
        blocks.extend(content);
    }

    // Footer: only region-level names are promoted, alphabetically.
    let mut footer: Vec<&ResolvedLink> =
        links.iter().filter(|l| catalog.is_region(&l.name)).collect();
    footer.sort_by(|a, b| a.name.cmp(&b.name));

    if !footer.is_empty() {
        blocks.push(Block::Heading {
            markup: "Booking Links:".to_string(),
            level: HeadingLevel::Section,
        });
        for link in footer {
            blocks.push(Block::LinkLine {
                name: link.name.clone(),
                link: link.link.clone(),
            });
        }
    }

    GeneratedDocument { blocks }
}
