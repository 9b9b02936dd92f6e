//! Statute scraping from the canonical legislation page.
//!
//! The source page lays every clause out in `td[valign="top"]` cells; a
//! bold tag inside a cell is its heading. Cells are numbered in document
//! order and headings become `Section N: Title` records.

use std::time::Duration;

use lexivox_core::config::ScrapeConfig;
use lexivox_core::{LexivoxError, Result};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One statute clause, in page order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatuteSection {
    /// 1-based position of the cell in the source page.
    pub number: usize,
    /// Bold heading text, when the cell has one.
    pub title: Option<String>,
    pub body: String,
}

impl StatuteSection {
    /// The numbered heading line, e.g. `Section 3: Punishment of offences`.
    pub fn heading(&self) -> Option<String> {
        self.title
            .as_ref()
            .map(|t| format!("Section {}: {}", self.number, t))
    }

    /// Render heading and body as plain text.
    pub fn to_text(&self) -> String {
        match self.heading() {
            Some(heading) if self.body.is_empty() => heading,
            Some(heading) => format!("{}\n{}", heading, self.body),
            None => self.body.clone(),
        }
    }
}

/// Parse statute sections out of the legislation page HTML.
///
/// Cells with neither a heading nor body text are skipped, but still
/// consume a position number so headings stay stable across reruns.
pub fn parse_statute(html: &str) -> Result<Vec<StatuteSection>> {
    let document = Html::parse_document(html);
    let cell_selector = Selector::parse(r#"td[valign="top"]"#)
        .map_err(|e| LexivoxError::Scrape(format!("invalid selector: {}", e)))?;
    let bold_selector = Selector::parse("b")
        .map_err(|e| LexivoxError::Scrape(format!("invalid selector: {}", e)))?;

    let mut sections = Vec::new();
    for (i, cell) in document.select(&cell_selector).enumerate() {
        let number = i + 1;
        let full_text = collapse_whitespace(cell.text());

        let title = cell
            .select(&bold_selector)
            .next()
            .map(|b| collapse_whitespace(b.text()))
            .filter(|t| !t.is_empty());

        let body = match &title {
            Some(t) => full_text.replacen(t.as_str(), "", 1).trim().to_string(),
            None => full_text,
        };

        if title.is_none() && body.is_empty() {
            continue;
        }
        sections.push(StatuteSection {
            number,
            title,
            body,
        });
    }

    if sections.is_empty() {
        return Err(LexivoxError::Scrape(
            "no statute cells found in page".to_string(),
        ));
    }
    Ok(sections)
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined = parts.collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetches the statute page and parses it into sections.
pub struct StatuteScraper {
    client: reqwest::Client,
    url: String,
}

impl StatuteScraper {
    pub fn new(url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| LexivoxError::Scrape(format!("failed to build client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        Self::new(
            &config.statute_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch and parse the statute page.
    pub async fn fetch_sections(&self) -> Result<Vec<StatuteSection>> {
        info!(url = %self.url, "Fetching statute page");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LexivoxError::Scrape(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LexivoxError::Scrape(format!("page returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LexivoxError::Scrape(format!("failed to read page body: {}", e)))?;
        let sections = parse_statute(&body)?;
        info!(sections = sections.len(), "Parsed statute sections");
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body><table>
        <tr><td valign="top"><b>Short title and extent.</b>
            This Act shall be called the Pakistan Penal Code.</td></tr>
        <tr><td valign="top">Continuation text without any heading.</td></tr>
        <tr><td valign="top"><b>Punishment of offences.</b>
            Every person shall be liable to punishment under this Code.</td></tr>
        <tr><td valign="middle">Layout cell, ignored.</td></tr>
        </table></body></html>
    "#;

    #[test]
    fn test_parse_statute_numbers_cells_in_order() {
        let sections = parse_statute(PAGE).unwrap();
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].number, 1);
        assert_eq!(sections[0].title.as_deref(), Some("Short title and extent."));
        assert_eq!(
            sections[0].body,
            "This Act shall be called the Pakistan Penal Code."
        );

        assert_eq!(sections[1].number, 2);
        assert_eq!(sections[1].title, None);

        assert_eq!(sections[2].number, 3);
        assert_eq!(
            sections[2].heading().unwrap(),
            "Section 3: Punishment of offences."
        );
    }

    #[test]
    fn test_parse_statute_skips_non_top_cells() {
        let sections = parse_statute(PAGE).unwrap();
        assert!(sections.iter().all(|s| !s.body.contains("Layout cell")));
    }

    #[test]
    fn test_parse_statute_collapses_whitespace() {
        let html = r#"<table><tr><td valign="top"><b>Title</b>
            body   with
            ragged    spacing</td></tr></table>"#;
        let sections = parse_statute(html).unwrap();
        assert_eq!(sections[0].body, "body with ragged spacing");
    }

    #[test]
    fn test_parse_statute_empty_page_fails() {
        assert!(parse_statute("<html><body></body></html>").is_err());
    }

    #[test]
    fn test_to_text_renders_heading_then_body() {
        let section = StatuteSection {
            number: 7,
            title: Some("Sense of expression once explained.".to_string()),
            body: "Every expression is used in conformity.".to_string(),
        };
        assert_eq!(
            section.to_text(),
            "Section 7: Sense of expression once explained.\nEvery expression is used in conformity."
        );
    }

    #[test]
    fn test_sections_serialize_to_json() {
        let sections = parse_statute(PAGE).unwrap();
        let json = serde_json::to_string(&sections).unwrap();
        let back: Vec<StatuteSection> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sections);
    }
}
