use serde::Serialize;

/// A catalog destination confirmed present (by name) in generated text.
/// De-duplicated by name; ordered by first appearance in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub name: String,
    pub link: String,
}

/// Heading weight for the renderer: brand banner, document title, or
/// section heading (subtitles, cost summaries, footer title).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    Brand,
    Title,
    Section,
}

/// One structurally classified unit of an assembled document. Text-bearing
/// variants carry markup that has already been escaped and bold-converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        markup: String,
        level: HeadingLevel,
    },
    DayHeader {
        markup: String,
    },
    OptionHeader {
        markup: String,
        link: Option<String>,
    },
    CostLine {
        markup: String,
    },
    BodyText {
        markup: String,
    },
    BannerSlot {
        banner: usize,
    },
    LinkLine {
        name: String,
        link: String,
    },
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::DayHeader { .. } => "day_header",
            Block::OptionHeader { .. } => "option_header",
            Block::CostLine { .. } => "cost_line",
            Block::BodyText { .. } => "body_text",
            Block::BannerSlot { .. } => "banner_slot",
            Block::LinkLine { .. } => "link_line",
        }
    }
}

/// The assembled document layout, consumed by the PDF renderer. Exists only
/// for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDocument {
    pub blocks: Vec<Block>,
}

impl GeneratedDocument {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.blocks.iter().map(Block::kind).collect()
    }

    pub fn banner_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::BannerSlot { .. }))
            .count()
    }
}
