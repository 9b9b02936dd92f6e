//! Section index over extracted statute text.
//!
//! Scans for heading lines of the form `Section N: Title` and records the
//! first occurrence of each with its 1-based line position. Later duplicates
//! (for example a table of contents followed by the body) are ignored.

use serde::{Deserialize, Serialize};

/// One heading with the line it first appears on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionEntry {
    pub heading: String,
    /// 1-based line number in the scanned text.
    pub position: usize,
}

/// Build an ordered, duplicate-free index of section headings.
pub fn build_section_index(text: &str) -> Vec<SectionEntry> {
    let mut entries: Vec<SectionEntry> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with("Section") {
            continue;
        }
        let Some((label, title)) = line.split_once(':') else {
            continue;
        };
        let heading = format!("{}: {}", label.trim(), title.trim());
        if entries.iter().any(|e| e.heading == heading) {
            continue;
        }
        entries.push(SectionEntry {
            heading,
            position: i + 1,
        });
    }
    entries
}
