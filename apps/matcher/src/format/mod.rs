//! Result formatting: pure transformations from analysis JSON to DisplayDocument.
//! Formatting never fails. Each field degrades to a placeholder on its own.

pub mod document;
pub mod fields;
pub mod job;
pub mod matching;
pub mod profile;

pub use document::{Block, DisplayDocument, Headline, Line, Section};
pub use job::format_job;
pub use matching::format_match;
pub use profile::format_profile;
