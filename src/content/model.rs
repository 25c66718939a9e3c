//! Course and lecture models

use serde::Serialize;

use super::frontmatter::FrontMatter;
use super::store::SpecialPage;

/// A course directory with its resolved metadata and lectures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Directory name, as stored
    pub slug: String,

    /// Title from `_course` metadata, else derived from the slug
    pub title: String,

    pub description: Option<String>,

    /// Lectures in slug order
    pub lectures: Vec<Lecture>,

    pub visible: bool,

    /// "Coming soon" courses
    pub preview: bool,

    /// Explicit sort key; unordered courses sort after ordered ones
    pub order: Option<i64>,

    pub special_files: SpecialFiles,
}

/// Which course-level companion pages are present and not hidden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialFiles {
    pub project: bool,
    pub resources: bool,
    pub practice_all: bool,
}

impl SpecialFiles {
    pub fn get(&self, page: SpecialPage) -> bool {
        match page {
            SpecialPage::Project => self.project,
            SpecialPage::Resources => self.resources,
            SpecialPage::PracticeAll => self.practice_all,
        }
    }

    pub fn set(&mut self, page: SpecialPage, present: bool) {
        match page {
            SpecialPage::Project => self.project = present,
            SpecialPage::Resources => self.resources = present,
            SpecialPage::PracticeAll => self.practice_all = present,
        }
    }

    /// Pages flagged present, in display order
    pub fn pages(&self) -> Vec<SpecialPage> {
        SpecialPage::ALL
            .into_iter()
            .filter(|page| self.get(*page))
            .collect()
    }
}

/// A lecture, or an assignment/practice companion document.
///
/// Companion records never have companions of their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    /// File stem (`01-intro`, or `01-intro.assignment` for companions)
    pub slug: String,

    pub title: String,

    pub description: Option<String>,

    /// Raw document body
    pub content: String,

    pub front_matter: FrontMatter,

    pub has_assignment: bool,
    pub assignment_visible: bool,

    pub has_practice: bool,
    pub practice_visible: bool,

    pub visible: bool,
}

impl Lecture {
    pub fn materials_url(&self) -> Option<&str> {
        self.front_matter.materials_url.as_deref()
    }

    pub fn code_url(&self) -> Option<&str> {
        self.front_matter.code_url.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.front_matter.tags
    }

    /// Assignment link should be offered
    pub fn shows_assignment(&self) -> bool {
        self.has_assignment && self.assignment_visible
    }

    /// Practice link should be offered
    pub fn shows_practice(&self) -> bool {
        self.has_practice && self.practice_visible
    }
}

/// A lecture with its neighbours in course order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub current: Lecture,
    pub next: Option<Lecture>,
    pub previous: Option<Lecture>,
    pub materials_url: Option<String>,
}
