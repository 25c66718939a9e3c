//! Document store reader - turns stored files into raw course and lecture
//! descriptors, before any visibility or ordering rules are applied.

use super::error::ContentError;
use super::frontmatter::FrontMatter;
use super::model::SpecialFiles;
use super::store::{DocumentKind, DocumentStore, SpecialPage, DEFAULT_EXTENSION};

/// A course directory as found in the store
#[derive(Debug, Clone, PartialEq)]
pub struct RawCourse {
    pub slug: String,
    /// Metadata from the course config document, if there is one
    pub config: Option<FrontMatter>,
    pub special_files: SpecialFiles,
}

/// A lecture document as found in the store
#[derive(Debug, Clone, PartialEq)]
pub struct RawLecture {
    pub slug: String,
    pub front_matter: FrontMatter,
    pub body: String,
    pub assignment: Sibling,
    pub practice: Sibling,
}

/// Presence and visibility of a companion document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sibling {
    pub exists: bool,
    pub visible: bool,
}

impl Sibling {
    const MISSING: Sibling = Sibling {
        exists: false,
        visible: true,
    };
}

/// Reads documents out of a [`DocumentStore`]
#[derive(Debug, Clone)]
pub struct ContentReader<S> {
    store: S,
    extension: String,
}

impl<S: DocumentStore> ContentReader<S> {
    pub fn new(store: S) -> Self {
        Self::with_extension(store, DEFAULT_EXTENSION)
    }

    pub fn with_extension(store: S, extension: &str) -> Self {
        Self {
            store,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Every course directory with its config and special-page flags
    pub fn list_courses(&self) -> Result<Vec<RawCourse>, ContentError> {
        self.store
            .course_slugs()?
            .into_iter()
            .map(|slug| self.read_course(&slug))
            .collect()
    }

    /// A single course directory, without its lectures
    pub fn read_course(&self, course: &str) -> Result<RawCourse, ContentError> {
        let mut special_files = SpecialFiles::default();
        for page in SpecialPage::ALL {
            let sibling = self.sibling(course, DocumentKind::Special(page), "");
            special_files.set(page, sibling.exists && sibling.visible);
        }

        Ok(RawCourse {
            slug: course.to_string(),
            config: self.course_config(course),
            special_files,
        })
    }

    /// Lecture documents of a course, in store order.
    ///
    /// A lecture that cannot be read is logged and left out.
    pub fn list_lecture_documents(&self, course: &str) -> Result<Vec<RawLecture>, ContentError> {
        let mut lectures = Vec::new();

        for file_name in self.store.file_names(course)? {
            let Some((DocumentKind::Lecture, slug)) =
                DocumentKind::classify(&file_name, &self.extension)
            else {
                continue;
            };

            match self.read_lecture(course, slug) {
                Ok(Some(lecture)) => lectures.push(lecture),
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to load lecture {}/{}: {}", course, slug, e),
            }
        }

        Ok(lectures)
    }

    /// One lecture document with its sibling flags
    pub fn read_lecture(&self, course: &str, slug: &str) -> Result<Option<RawLecture>, ContentError> {
        let Some((front_matter, body)) = self.read_document(course, DocumentKind::Lecture, slug)?
        else {
            return Ok(None);
        };

        Ok(Some(RawLecture {
            slug: slug.to_string(),
            front_matter,
            body,
            assignment: self.sibling(course, DocumentKind::Assignment, slug),
            practice: self.sibling(course, DocumentKind::Practice, slug),
        }))
    }

    /// Metadata and body of any document; `None` if it does not exist
    pub fn read_document(
        &self,
        course: &str,
        kind: DocumentKind,
        stem: &str,
    ) -> Result<Option<(FrontMatter, String)>, ContentError> {
        let file_name = kind.file_name(stem, &self.extension);
        let Some(content) = self.store.read(course, &file_name)? else {
            return Ok(None);
        };

        let (front_matter, body) = FrontMatter::parse_lenient(&content);
        Ok(Some((front_matter, body.to_string())))
    }

    /// Course config metadata; an unreadable config falls back to defaults
    fn course_config(&self, course: &str) -> Option<FrontMatter> {
        match self.read_document(course, DocumentKind::CourseConfig, "") {
            Ok(document) => document.map(|(front_matter, _)| front_matter),
            Err(e) => {
                tracing::warn!("Unreadable config for course {}, using defaults: {}", course, e);
                None
            }
        }
    }

    /// Existence and visibility of a companion document.
    ///
    /// Never fails: a companion that cannot be read or parsed counts as
    /// visible.
    fn sibling(&self, course: &str, kind: DocumentKind, stem: &str) -> Sibling {
        let file_name = kind.file_name(stem, &self.extension);
        if !self.store.exists(course, &file_name) {
            return Sibling::MISSING;
        }

        let visible = match self.store.read(course, &file_name) {
            Ok(Some(content)) => match FrontMatter::parse(&content) {
                Ok((front_matter, _)) => front_matter.is_visible(),
                Err(e) => {
                    tracing::warn!("Malformed {}/{}, treating as visible: {}", course, file_name, e);
                    true
                }
            },
            Ok(None) => true,
            Err(e) => {
                tracing::warn!("Unreadable {}/{}, treating as visible: {}", course, file_name, e);
                true
            }
        };

        Sibling {
            exists: true,
            visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::store::{FsStore, MemoryStore};
    use std::fs;
    use tempfile::TempDir;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert("js", "_course.mdx", "---\ntitle: JavaScript\norder: 2\n---\n")
            .insert("js", "01-intro.mdx", "---\ntitle: Intro\n---\nHello")
            .insert("js", "01-intro.assignment.mdx", "---\nvisible: false\n---\nDo it")
            .insert("js", "01-intro.practice.mdx", "---\ntitle: [broken\n---\n")
            .insert("js", "02-loops.mdx", "Loops body")
            .insert("js", "02-loops.assignment.mdx", "no metadata")
            .insert("js", "project.mdx", "---\nvisible: false\n---\n")
            .insert("js", "resources.mdx", "Links")
            .insert("js", "_notes.mdx", "private")
            .insert("js", "diagram.png", "binary");
        store
    }

    #[test]
    fn test_list_lecture_documents() {
        let reader = ContentReader::new(store());
        let lectures = reader.list_lecture_documents("js").unwrap();

        let slugs: Vec<_> = lectures.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(slugs, vec!["01-intro", "02-loops"]);

        let intro = &lectures[0];
        assert_eq!(intro.front_matter.title.as_deref(), Some("Intro"));
        assert_eq!(intro.body, "Hello");
        assert_eq!(
            intro.assignment,
            Sibling {
                exists: true,
                visible: false
            }
        );
        // Malformed practice metadata falls back to visible
        assert_eq!(
            intro.practice,
            Sibling {
                exists: true,
                visible: true
            }
        );

        let loops = &lectures[1];
        assert_eq!(loops.body, "Loops body");
        assert!(loops.assignment.exists && loops.assignment.visible);
        assert!(!loops.practice.exists);
    }

    #[test]
    fn test_read_course() {
        let reader = ContentReader::new(store());
        let course = reader.read_course("js").unwrap();
        let config = course.config.unwrap();
        assert_eq!(config.title.as_deref(), Some("JavaScript"));
        assert_eq!(config.order, Some(2));
        assert!(!course.special_files.project);
        assert!(course.special_files.resources);
        assert!(!course.special_files.practice_all);
    }

    #[test]
    fn test_read_missing_lecture() {
        let reader = ContentReader::new(store());
        assert_eq!(reader.read_lecture("js", "99-nope").unwrap(), None);
        assert_eq!(reader.read_lecture("nope", "01-intro").unwrap(), None);
    }

    #[test]
    fn test_custom_extension() {
        let mut store = MemoryStore::new();
        store
            .insert("go", "basics.md", "md body")
            .insert("go", "ignored.mdx", "mdx body");
        let reader = ContentReader::with_extension(store, ".md");
        let lectures = reader.list_lecture_documents("go").unwrap();
        assert_eq!(lectures.len(), 1);
        assert_eq!(lectures[0].slug, "basics");
    }

    #[test]
    fn test_fs_reader() {
        let tmp = TempDir::new().unwrap();
        let course = tmp.path().join("C#");
        fs::create_dir_all(&course).unwrap();
        fs::write(course.join("01-types.mdx"), "---\ndescription: Types\n---\nBody").unwrap();
        fs::write(course.join("01-types.practice.mdx"), "Practice").unwrap();

        let reader = ContentReader::new(FsStore::new(tmp.path()));
        let courses = reader.list_courses().unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].slug, "C#");
        assert_eq!(courses[0].config, None);

        let lectures = reader.list_lecture_documents("C#").unwrap();
        assert_eq!(lectures[0].front_matter.description.as_deref(), Some("Types"));
        assert!(lectures[0].practice.exists);
    }

    #[test]
    fn test_unreadable_course_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let course = tmp.path().join("sql");
        // A directory where the config file should be cannot be read as a document
        fs::create_dir_all(course.join("_course.mdx")).unwrap();
        fs::write(course.join("select.mdx"), "SELECT").unwrap();

        let reader = ContentReader::new(FsStore::new(tmp.path()));
        let course = reader.read_course("sql").unwrap();
        assert_eq!(course.config, None);
        assert_eq!(reader.list_courses().unwrap().len(), 1);
    }
}
