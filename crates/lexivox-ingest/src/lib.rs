//! Document ingestion: statute scraping, PDF text extraction, and section
//! indexing.
//!
//! Everything here runs ahead of chat time. The scraper pulls the statute
//! from its canonical web page, the extractor turns a statute PDF into plain
//! text, and the section index maps `Section N: Title` headings to their
//! positions for quick lookup.

pub mod extract;
pub mod scrape;
pub mod sections;

pub use extract::extract_pdf_text;
pub use scrape::{parse_statute, StatuteScraper, StatuteSection};
pub use sections::{build_section_index, SectionEntry};
