use serde_json::Value;

use super::document::{Block, DisplayDocument, Headline, Section};
use super::fields::{field, items, list, lookup, percentage, scalar, MISSING_VALUE};
use crate::scoring::{classify, Tier};

pub const SKILL_MATCHING: &str = "Skill Matching";

/// Match sections in display order.
pub const MATCH_SECTIONS: &[&str] = &[
    SKILL_MATCHING,
    "Experience Relevance",
    "Educational Alignment",
    "Cultural and Soft Skills Fit",
    "Language and International Experience",
    "Growth Potential",
];

const OVERALL_SCORE: &str = "Overall Compatibility Score";
const DETAILS: &str = "Details";
const SUMMARY: &str = "Summary";

/// Formats a match result: a colored overall score, one section per match
/// criterion, then the free-text summary.
pub fn format_match(doc: &Value) -> DisplayDocument {
    let mut out = DisplayDocument::new("Compatibility Match");

    let overall = percentage(lookup(doc, &[OVERALL_SCORE]));
    out.headline = Some(Headline {
        label: OVERALL_SCORE.to_string(),
        value: percent_text(overall),
        color: tier_of(overall).color(),
    });

    for title in MATCH_SECTIONS {
        let detail = lookup(doc, &[DETAILS, *title]);
        out.sections.push(format_section(title, detail));
    }

    out.sections.push(
        Section::new(SUMMARY).with_block(field(SUMMARY, scalar(lookup(doc, &[SUMMARY])))),
    );

    out
}

/// Formats one criterion. `detail` is whatever the result holds under
/// `Details.<title>`; any part of it may be missing or malformed.
pub fn format_section(title: &str, detail: Option<&Value>) -> Section {
    let get = |key: &str| detail.and_then(|d| lookup(d, &[key]));

    let score = percentage(get("Percentage Match"));
    let status = scalar(get("Match Status")).unwrap_or_else(|| MISSING_VALUE.to_string());

    let mut section = Section::new(title);
    section.summary = Some(format!("{status}, {}", percent_text(score)));
    section.color = Some(tier_of(score).color());

    let block = if title == SKILL_MATCHING {
        Block::Columns {
            columns: vec![
                list("Matched Skills", items(get("Matched Skills"))),
                list("Unmatched Skills", items(get("Unmatched Skills"))),
            ],
        }
    } else {
        suggestions(get("Suggestions"))
    };
    section.blocks.push(block);
    section
}

/// Suggestions come back either as a list or as a single paragraph.
fn suggestions(value: Option<&Value>) -> Block {
    const LABEL: &str = "Suggestions";
    match value {
        Some(Value::Array(_)) => match items(value) {
            Some(items) => Block::Bullets {
                label: LABEL.to_string(),
                items,
            },
            None => field(LABEL, None),
        },
        other => field(LABEL, scalar(other)),
    }
}

/// An unparseable score classifies like any score below every threshold.
fn tier_of(score: Option<i64>) -> Tier {
    score.map(classify).unwrap_or(Tier::Poor)
}

fn percent_text(score: Option<i64>) -> String {
    match score {
        Some(s) => format!("{s}%"),
        None => MISSING_VALUE.to_string(),
    }
}
