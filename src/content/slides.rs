//! Slide segmentation.
//!
//! A lecture body is cut into slides at boundary headings. Slide 0 is
//! always a synthetic title slide; the remaining slides partition the body.

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::markdown::MarkdownRenderer;

lazy_static! {
    static ref HEADING: Regex =
        Regex::new(r"^(#{1,6})[ \t]+(.*?)[ \t]*$").expect("heading pattern is valid");
}

/// Heading levels that start a new slide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideBoundary {
    /// `##` only
    #[default]
    #[serde(rename = "h2")]
    H2,
    /// `##` or `###`
    #[serde(rename = "h2-h3")]
    H2OrH3,
}

impl SlideBoundary {
    /// Deepest heading level that starts a slide
    pub fn deepest_level(self) -> usize {
        match self {
            SlideBoundary::H2 => 2,
            SlideBoundary::H2OrH3 => 3,
        }
    }

    fn splits_at(self, level: usize) -> bool {
        (2..=self.deepest_level()).contains(&level)
    }
}

impl std::str::FromStr for SlideBoundary {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "h2" | "2" => Ok(SlideBoundary::H2),
            "h2-h3" | "h2h3" | "3" => Ok(SlideBoundary::H2OrH3),
            other => anyhow::bail!("Unknown slide boundary: {}. Available: h2, h2-h3", other),
        }
    }
}

/// One presentation screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    /// Position in the deck; 0 is the title slide
    pub index: usize,
    pub title: String,
    /// Markdown owned by this slide
    pub content: String,
    /// Rendered content, filled in by [`compile_slides`]
    pub html: Option<String>,
}

impl Slide {
    fn new(index: usize, title: &str, content: String) -> Self {
        Self {
            index,
            title: title.to_string(),
            content,
            html: None,
        }
    }
}

/// Cut `body` into slides, preceded by a title slide for `title`.
///
/// Segments are trimmed and whitespace-only segments are dropped. Headings
/// inside fenced code blocks are ignored.
pub fn segment_slides(body: &str, title: &str, boundary: SlideBoundary) -> Vec<Slide> {
    let mut slides = vec![Slide::new(0, title, format!("# {}", title))];

    let mut starts = vec![0];
    let mut fence: Option<Fence> = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        match fence {
            Some(open) => {
                if open.closed_by(text) {
                    fence = None;
                }
            }
            None => {
                if let Some(opened) = Fence::opened_by(text) {
                    fence = Some(opened);
                } else if heading(text).is_some_and(|(level, _)| boundary.splits_at(level)) {
                    starts.push(offset);
                }
            }
        }
        offset += line.len();
    }
    starts.push(body.len());

    for window in starts.windows(2) {
        let segment = body[window[0]..window[1]].trim();
        if segment.is_empty() {
            continue;
        }
        let slide_title = segment_title(segment, boundary).unwrap_or(title);
        slides.push(Slide::new(slides.len(), slide_title, segment.to_string()));
    }

    slides
}

/// Title from a segment's first line, if it is a heading at or above the
/// deepest boundary level
fn segment_title(segment: &str, boundary: SlideBoundary) -> Option<&str> {
    let first = segment.lines().next()?;
    let (level, text) = heading(first)?;
    (level <= boundary.deepest_level() && !text.is_empty()).then_some(text)
}

/// ATX heading level and text
fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2).map_or("", |m| m.as_str().trim());
    Some((level, text))
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn parse(line: &str) -> Option<(Self, &str)> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then(|| (Fence { marker, len }, &trimmed[len..]))
    }

    fn opened_by(line: &str) -> Option<Self> {
        Self::parse(line).map(|(fence, _)| fence)
    }

    fn closed_by(self, line: &str) -> bool {
        Self::parse(line).is_some_and(|(fence, rest)| {
            fence.marker == self.marker && fence.len >= self.len && rest.trim().is_empty()
        })
    }
}

/// Render every slide concurrently; the result keeps slide order.
pub async fn compile_slides(renderer: Arc<MarkdownRenderer>, slides: Vec<Slide>) -> Result<Vec<Slide>> {
    let handles: Vec<_> = slides
        .into_iter()
        .map(|mut slide| {
            let renderer = Arc::clone(&renderer);
            tokio::task::spawn_blocking(move || -> Result<Slide> {
                slide.html = Some(renderer.render(&slide.content)?);
                Ok(slide)
            })
        })
        .collect();

    let mut compiled = Vec::with_capacity(handles.len());
    for handle in handles {
        compiled.push(handle.await??);
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(slides: &[Slide]) -> Vec<&str> {
        slides.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_reference_example() {
        let body = "# Intro\ncontent\n## Part A\ntext A\n## Part B\ntext B";
        let slides = segment_slides(body, "Lecture 1", SlideBoundary::H2);

        assert_eq!(slides.len(), 4);
        assert_eq!(slides[0].title, "Lecture 1");
        assert_eq!(slides[0].content, "# Lecture 1");
        assert_eq!(slides[1].title, "Intro");
        assert_eq!(slides[1].content, "# Intro\ncontent");
        assert_eq!(slides[2].title, "Part A");
        assert_eq!(slides[2].content, "## Part A\ntext A");
        assert_eq!(slides[3].title, "Part B");
        assert_eq!(slides[3].content, "## Part B\ntext B");
        let indexes: Vec<_> = slides.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_body() {
        let slides = segment_slides("", "Empty", SlideBoundary::H2);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].content, "# Empty");

        let slides = segment_slides("  \n\n", "Blank", SlideBoundary::H2);
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_no_boundary_headings() {
        let body = "Just some text\n\nand more";
        let slides = segment_slides(body, "Notes", SlideBoundary::H2);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title, "Notes");
        assert_eq!(slides[1].content, body);
    }

    #[test]
    fn test_lower_headings_stay_in_slide() {
        let body = "## Loops\n### for\nfor x in y\n#### detail\n## While\nwhile true";
        let slides = segment_slides(body, "L", SlideBoundary::H2);
        assert_eq!(titles(&slides), vec!["L", "Loops", "While"]);
        assert_eq!(slides[1].content, "## Loops\n### for\nfor x in y\n#### detail");
    }

    #[test]
    fn test_h2_h3_boundary() {
        let body = "## Loops\n### for\nfor x in y\n### while\nwhile true";
        let slides = segment_slides(body, "L", SlideBoundary::H2OrH3);
        assert_eq!(titles(&slides), vec!["L", "Loops", "for", "while"]);
        assert_eq!(slides[1].content, "## Loops");
        assert_eq!(slides[2].content, "### for\nfor x in y");
    }

    #[test]
    fn test_h3_title_only_with_h3_boundary() {
        let body = "### Sub\ntext";
        let slides = segment_slides(body, "L", SlideBoundary::H2);
        assert_eq!(slides[1].title, "L");
        assert_eq!(slides[1].content, "### Sub\ntext");
    }

    #[test]
    fn test_partition_keeps_all_text() {
        let body = "preamble\n\n## One\na\n\n## Two\nb\n## Three\nc\n";
        let slides = segment_slides(body, "T", SlideBoundary::H2);
        let rejoined: String = slides[1..]
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(squash(&rejoined), squash(body));
    }

    #[test]
    fn test_headings_in_code_fences_ignored() {
        let body = "## Shell\n```bash\n## not a slide\necho hi\n```\n## Next\nok";
        let slides = segment_slides(body, "T", SlideBoundary::H2);
        assert_eq!(titles(&slides), vec!["T", "Shell", "Next"]);
        assert!(slides[1].content.contains("## not a slide"));
    }

    #[test]
    fn test_tilde_fence_needs_matching_close() {
        let body = "~~~~\n```\n## hidden\n~~~~\n## Shown";
        let slides = segment_slides(body, "T", SlideBoundary::H2);
        assert_eq!(titles(&slides), vec!["T", "T", "Shown"]);
    }

    #[test]
    fn test_malformed_headings() {
        let body = "##NoSpace\n#######seven\n##\n## \ntext";
        let slides = segment_slides(body, "T", SlideBoundary::H2);
        // "## " is a boundary with no text, so its slide keeps the lecture title
        assert_eq!(titles(&slides), vec!["T", "T", "T"]);
    }

    #[test]
    fn test_crlf_body() {
        let body = "## One\r\na\r\n## Two\r\nb";
        let slides = segment_slides(body, "T", SlideBoundary::H2);
        assert_eq!(titles(&slides), vec!["T", "One", "Two"]);
        assert_eq!(slides[1].content, "## One\r\na");
    }

    #[test]
    fn test_parse_boundary() {
        assert_eq!("h2".parse::<SlideBoundary>().unwrap(), SlideBoundary::H2);
        assert_eq!(
            "h2-h3".parse::<SlideBoundary>().unwrap(),
            SlideBoundary::H2OrH3
        );
        assert!("h4".parse::<SlideBoundary>().is_err());
    }

    #[tokio::test]
    async fn test_compile_slides_keeps_order() {
        let body = "## A\nalpha\n## B\nbeta\n## C\ngamma";
        let slides = segment_slides(body, "Deck", SlideBoundary::H2);
        let renderer = Arc::new(MarkdownRenderer::new());

        let compiled = compile_slides(renderer, slides).await.unwrap();
        assert_eq!(titles(&compiled), vec!["Deck", "A", "B", "C"]);
        let html = compiled[0].html.as_deref().unwrap();
        assert!(html.contains("<h1>Deck</h1>"));
        assert!(compiled[3].html.as_deref().unwrap().contains("gamma"));
    }
}
