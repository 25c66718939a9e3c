//! Document storage backends.
//!
//! The rest of the content pipeline only sees documents addressed by
//! `(course, file name)`. [`FsStore`] maps that onto `<root>/<course>/<file>`;
//! [`MemoryStore`] keeps everything in a map.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::ContentError;

/// Course config documents start with this; it also marks private files
pub const PRIVATE_PREFIX: char = '_';
/// Stem of the course config document (`_course.<ext>`)
pub const COURSE_CONFIG_STEM: &str = "_course";
/// Default body-markup extension
pub const DEFAULT_EXTENSION: &str = "mdx";

const ASSIGNMENT_SUFFIX: &str = "assignment";
const PRACTICE_SUFFIX: &str = "practice";

/// Course-level companion pages that are never lectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialPage {
    Project,
    Resources,
    PracticeAll,
}

impl SpecialPage {
    pub const ALL: [SpecialPage; 3] = [
        SpecialPage::Project,
        SpecialPage::Resources,
        SpecialPage::PracticeAll,
    ];

    /// File stem and URL segment
    pub fn stem(self) -> &'static str {
        match self {
            SpecialPage::Project => "project",
            SpecialPage::Resources => "resources",
            SpecialPage::PracticeAll => "practice-all",
        }
    }

    pub fn from_stem(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.stem() == stem)
    }
}

/// What a document is, relative to the course it lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Lecture,
    Assignment,
    Practice,
    CourseConfig,
    Special(SpecialPage),
}

impl DocumentKind {
    /// File name for this kind of document.
    ///
    /// `stem` is the lecture slug for lecture-scoped kinds and ignored for
    /// course-scoped ones.
    pub fn file_name(self, stem: &str, extension: &str) -> String {
        match self {
            DocumentKind::Lecture => format!("{}.{}", stem, extension),
            DocumentKind::Assignment => format!("{}.{}.{}", stem, ASSIGNMENT_SUFFIX, extension),
            DocumentKind::Practice => format!("{}.{}.{}", stem, PRACTICE_SUFFIX, extension),
            DocumentKind::CourseConfig => format!("{}.{}", COURSE_CONFIG_STEM, extension),
            DocumentKind::Special(page) => format!("{}.{}", page.stem(), extension),
        }
    }

    /// Classify a file name; `None` for files that are not documents.
    ///
    /// Returns the kind and the stem (lecture slug for lecture-scoped kinds).
    pub fn classify<'a>(file_name: &'a str, extension: &str) -> Option<(Self, &'a str)> {
        let stem = file_name
            .strip_suffix(extension)
            .and_then(|s| s.strip_suffix('.'))
            .filter(|s| !s.is_empty())?;

        if stem == COURSE_CONFIG_STEM {
            return Some((DocumentKind::CourseConfig, stem));
        }
        if stem.starts_with(PRIVATE_PREFIX) {
            return None;
        }
        if let Some(page) = SpecialPage::from_stem(stem) {
            return Some((DocumentKind::Special(page), stem));
        }
        if let Some(lecture) = strip_compound(stem, ASSIGNMENT_SUFFIX) {
            return Some((DocumentKind::Assignment, lecture));
        }
        if let Some(lecture) = strip_compound(stem, PRACTICE_SUFFIX) {
            return Some((DocumentKind::Practice, lecture));
        }
        Some((DocumentKind::Lecture, stem))
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Lecture => "lecture",
            DocumentKind::Assignment => "assignment",
            DocumentKind::Practice => "practice",
            DocumentKind::CourseConfig => "course config",
            DocumentKind::Special(page) => page.stem(),
        }
    }
}

fn strip_compound<'a>(stem: &'a str, suffix: &str) -> Option<&'a str> {
    stem.strip_suffix(suffix)
        .and_then(|s| s.strip_suffix('.'))
        .filter(|s| !s.is_empty())
}

/// Read access to a tree of course documents
pub trait DocumentStore {
    /// Course identifiers, sorted
    fn course_slugs(&self) -> Result<Vec<String>, ContentError>;

    /// File names directly inside a course, sorted; empty for unknown courses
    fn file_names(&self, course: &str) -> Result<Vec<String>, ContentError>;

    /// Document text, or `None` when it does not exist
    fn read(&self, course: &str, file_name: &str) -> Result<Option<String>, ContentError>;

    fn exists(&self, course: &str, file_name: &str) -> bool;
}

/// Filesystem store rooted at the content directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn course_dir(&self, course: &str) -> PathBuf {
        self.root.join(course)
    }

    /// Entries one level below `dir`, skipping hidden names
    fn entries(&self, dir: &Path, want_dirs: bool) -> Result<Vec<String>, ContentError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            if entry.file_type().is_dir() != want_dirs {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                tracing::debug!("Skipping non UTF-8 entry {:?}", entry.path());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name.to_string());
        }
        Ok(names)
    }
}

impl DocumentStore for FsStore {
    fn course_slugs(&self) -> Result<Vec<String>, ContentError> {
        if !self.root.exists() {
            tracing::debug!("Content root {:?} does not exist", self.root);
        }
        self.entries(&self.root, true)
    }

    fn file_names(&self, course: &str) -> Result<Vec<String>, ContentError> {
        self.entries(&self.course_dir(course), false)
    }

    fn read(&self, course: &str, file_name: &str) -> Result<Option<String>, ContentError> {
        let path = self.course_dir(course).join(file_name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ContentError::io(path, e)),
        }
    }

    fn exists(&self, course: &str, file_name: &str) -> bool {
        self.course_dir(course).join(file_name).is_file()
    }
}

/// In-memory store, keyed by course then file name
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    courses: BTreeMap<String, BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an (initially empty) course
    pub fn add_course(&mut self, course: &str) -> &mut Self {
        self.courses.entry(course.to_string()).or_default();
        self
    }

    /// Add or replace a document, creating its course if needed
    pub fn insert(&mut self, course: &str, file_name: &str, content: &str) -> &mut Self {
        self.courses
            .entry(course.to_string())
            .or_default()
            .insert(file_name.to_string(), content.to_string());
        self
    }
}

impl DocumentStore for MemoryStore {
    fn course_slugs(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.courses.keys().cloned().collect())
    }

    fn file_names(&self, course: &str) -> Result<Vec<String>, ContentError> {
        Ok(self
            .courses
            .get(course)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read(&self, course: &str, file_name: &str) -> Result<Option<String>, ContentError> {
        Ok(self
            .courses
            .get(course)
            .and_then(|files| files.get(file_name))
            .cloned())
    }

    fn exists(&self, course: &str, file_name: &str) -> bool {
        self.courses
            .get(course)
            .is_some_and(|files| files.contains_key(file_name))
    }
}
