use std::fmt;

use serde::Serialize;

use crate::scoring::Color;

const BULLET: &str = "• ";
const COLUMN_GAP: usize = 4;

/// Structured, presentation-neutral rendering of an analysis or match result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDocument {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<Headline>,
    pub sections: Vec<Section>,
}

/// A scored headline, e.g. the overall compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub label: String,
    pub value: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `label: value` on one line.
    Field { label: String, value: String },
    /// A label followed by one bullet line per item, in source order.
    Bullets { label: String, items: Vec<String> },
    /// A label followed by free text (or a placeholder) on its own line.
    Note { label: String, text: String },
    /// Blocks laid out side by side.
    Columns { columns: Vec<Block> },
}

/// One line of rendered output, with the color it should be drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub color: Option<Color>,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            color: None,
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Finds the first block with the given label, searching inside columns.
    pub fn block(&self, label: &str) -> Option<&Block> {
        find_block(&self.blocks, label)
    }
}

fn find_block<'a>(blocks: &'a [Block], label: &str) -> Option<&'a Block> {
    blocks.iter().find_map(|b| match b {
        Block::Columns { columns } => find_block(columns, label),
        other if other.label() == Some(label) => Some(other),
        _ => None,
    })
}

impl Block {
    pub fn label(&self) -> Option<&str> {
        match self {
            Block::Field { label, .. } | Block::Bullets { label, .. } | Block::Note { label, .. } => {
                Some(label)
            }
            Block::Columns { .. } => None,
        }
    }

    fn lines(&self) -> Vec<String> {
        match self {
            Block::Field { label, value } => vec![format!("{label}: {value}")],
            Block::Bullets { label, items } => std::iter::once(format!("{label}:"))
                .chain(items.iter().map(|item| format!("{BULLET}{item}")))
                .collect(),
            Block::Note { label, text } => vec![format!("{label}:"), text.clone()],
            Block::Columns { columns } => side_by_side(columns),
        }
    }
}

fn side_by_side(columns: &[Block]) -> Vec<String> {
    let rendered: Vec<Vec<String>> = columns.iter().map(Block::lines).collect();
    let rows = rendered.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = rendered
        .iter()
        .map(|col| col.iter().map(|l| l.chars().count()).max().unwrap_or(0))
        .collect();

    (0..rows)
        .map(|row| {
            let mut line = String::new();
            for (i, col) in rendered.iter().enumerate() {
                let cell = col.get(row).map(String::as_str).unwrap_or("");
                if i + 1 == rendered.len() {
                    line.push_str(cell);
                } else {
                    let pad = widths[i] + COLUMN_GAP - cell.chars().count();
                    line.push_str(cell);
                    line.push_str(&" ".repeat(pad));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

impl DisplayDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            headline: None,
            sections: Vec::new(),
        }
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Renders the document as colored lines for a presentation layer.
    pub fn render(&self) -> Vec<Line> {
        let mut out = vec![Line::plain(self.title.clone())];

        if let Some(headline) = &self.headline {
            out.push(Line {
                text: format!("{}: {}", headline.label, headline.value),
                color: Some(headline.color),
            });
        }

        for section in &self.sections {
            out.push(Line::plain(""));
            let heading = match &section.summary {
                Some(summary) => format!("{} ({summary})", section.title),
                None => section.title.clone(),
            };
            out.push(Line {
                text: heading,
                color: section.color,
            });
            for block in &section.blocks {
                out.extend(block.lines().into_iter().map(Line::plain));
            }
        }

        out
    }

    /// Plain text lines, without color.
    pub fn lines(&self) -> Vec<String> {
        self.render().into_iter().map(|l| l.text).collect()
    }
}

impl fmt::Display for DisplayDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
