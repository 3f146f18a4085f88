use serde_json::Value;

use super::document::{DisplayDocument, Section};
use super::fields::{field, items, list, lookup, scalar, MISSING_VALUE};

/// Formats a job analysis. The document title is the job title.
pub fn format_job(doc: &Value) -> DisplayDocument {
    let title = scalar(lookup(doc, &["jobTitle"])).unwrap_or_else(|| MISSING_VALUE.to_string());
    let mut out = DisplayDocument::new(title);

    out.sections.push(
        Section::new("Position")
            .with_block(field("Location", scalar(lookup(doc, &["location"]))))
            .with_block(field(
                "Experience Level",
                scalar(lookup(doc, &["experienceLevel"])),
            ))
            .with_block(field(
                "Degree Level",
                scalar(lookup(doc, &["academicRequirements", "degreeLevel"])),
            ))
            .with_block(field("Overview", scalar(lookup(doc, &["overview"])))),
    );

    let company = |key: &str| lookup(doc, &["companyInfo", key]);
    out.sections.push(
        Section::new("Company")
            .with_block(field("Name", scalar(company("name"))))
            .with_block(field("LinkedIn", scalar(company("linkedinUrl"))))
            .with_block(field("Overview", scalar(company("overview"))))
            .with_block(list("Specialties", items(company("specialties")))),
    );

    out.sections.push(
        Section::new("Requirements")
            .with_block(list(
                "Hard Skills",
                items(lookup(doc, &["skillsRequired", "hardSkills"])),
            ))
            .with_block(list(
                "Soft Skills",
                items(lookup(doc, &["skillsRequired", "softSkills"])),
            ))
            .with_block(list(
                "Languages",
                items(lookup(doc, &["languageRequirements"])),
            )),
    );

    out.sections.push(Section::new("Responsibilities").with_block(list(
        "Key Responsibilities",
        items(lookup(doc, &["keyResponsibilities"])),
    )));

    out
}
