use serde_json::Value;

use super::document::{DisplayDocument, Section};
use super::fields::{field, items, list, lookup, scalar, scalar_or_member, MISSING_VALUE};

/// Lists rendered after the overview, in display order.
const PROFILE_LISTS: &[(&str, &str)] = &[
    ("languages", "Languages"),
    ("hardSkills", "Hard Skills"),
    ("softSkills", "Soft Skills"),
    ("strengths", "Strengths"),
    ("weaknesses", "Weaknesses"),
    ("improvementSuggestions", "Improvement Suggestions"),
    ("careerSuggestions", "Career Suggestions"),
];

/// Formats a profile analysis. The document title is the candidate's name.
pub fn format_profile(doc: &Value) -> DisplayDocument {
    let title = scalar(lookup(doc, &["fullName"])).unwrap_or_else(|| MISSING_VALUE.to_string());
    let mut out = DisplayDocument::new(title);

    out.sections.push(
        Section::new("Profile")
            .with_block(field("Location", scalar(lookup(doc, &["location"]))))
            .with_block(field("Overview", scalar(lookup(doc, &["overview"]))))
            .with_block(field(
                "Profile Picture",
                scalar(lookup(doc, &["profilePictureUrl"])),
            )),
    );

    out.sections.push(highest_degree(doc));

    let mut skills = Section::new("Skills & Assessment");
    for (key, label) in PROFILE_LISTS {
        skills = skills.with_block(list(label, items(lookup(doc, &[*key]))));
    }
    out.sections.push(skills);

    out
}

fn highest_degree(doc: &Value) -> Section {
    let degree = |key: &str| lookup(doc, &["highestDegree", key]);

    Section::new("Highest Degree")
        .with_block(field("Level", scalar(degree("level"))))
        .with_block(field("Field of Study", scalar(degree("fieldOfStudy"))))
        .with_block(field(
            "Institution",
            scalar_or_member(degree("institution"), "name"),
        ))
        .with_block(field("Graduation Date", scalar(degree("graduationDate"))))
}
