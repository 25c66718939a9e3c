//! Query surface over a document store.
//!
//! Every call re-reads the store; nothing is cached between calls.

use std::borrow::Cow;

use super::error::ContentError;
use super::frontmatter::FrontMatter;
use super::model::{Course, Lecture, Navigation};
use super::navigation::navigate;
use super::reader::ContentReader;
use super::resolver::{resolve_course, resolve_courses, resolve_lecture, resolve_lectures};
use super::slides::{segment_slides, Slide, SlideBoundary};
use super::slug::{decode_slug, format_title, is_path_segment};
use super::store::{DocumentKind, DocumentStore, SpecialPage, DEFAULT_EXTENSION};

/// Courses, lectures and slides read from a [`DocumentStore`]
#[derive(Debug, Clone)]
pub struct Library<S> {
    reader: ContentReader<S>,
    boundary: SlideBoundary,
}

impl<S: DocumentStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, DEFAULT_EXTENSION, SlideBoundary::default())
    }

    pub fn with_options(store: S, extension: &str, boundary: SlideBoundary) -> Self {
        Self {
            reader: ContentReader::with_extension(store, extension),
            boundary,
        }
    }

    pub fn reader(&self) -> &ContentReader<S> {
        &self.reader
    }

    pub fn boundary(&self) -> SlideBoundary {
        self.boundary
    }

    /// All non-empty courses in display order.
    ///
    /// With `respect_visibility`, hidden courses and lectures are left out.
    pub fn list_courses(&self, respect_visibility: bool) -> Result<Vec<Course>, ContentError> {
        let mut courses = Vec::new();
        for raw in self.reader.list_courses()? {
            let lectures = resolve_lectures(
                self.reader.list_lecture_documents(&raw.slug)?,
                respect_visibility,
            );
            courses.push(resolve_course(raw, lectures));
        }
        Ok(resolve_courses(courses, respect_visibility))
    }

    /// Lectures of one course in slug order; empty for an unknown course
    pub fn list_lectures(
        &self,
        course: &str,
        respect_visibility: bool,
    ) -> Result<Vec<Lecture>, ContentError> {
        let Some(course) = segment(course) else {
            return Ok(Vec::new());
        };
        Ok(resolve_lectures(
            self.reader.list_lecture_documents(&course)?,
            respect_visibility,
        ))
    }

    /// One course with its lectures, under the same rules as `list_courses`
    pub fn get_course(&self, course: &str, respect_visibility: bool) -> Result<Course, ContentError> {
        let Some(slug) = segment(course) else {
            return Err(ContentError::CourseNotFound {
                course: course.to_string(),
            });
        };
        let raw = self.reader.read_course(&slug)?;
        let lectures = resolve_lectures(
            self.reader.list_lecture_documents(&slug)?,
            respect_visibility,
        );

        resolve_courses(vec![resolve_course(raw, lectures)], respect_visibility)
            .pop()
            .ok_or_else(|| ContentError::CourseNotFound {
                course: slug.into_owned(),
            })
    }

    /// A lecture regardless of its visibility, with companion flags from
    /// the companion documents
    pub fn get_lecture(&self, course: &str, lecture: &str) -> Result<Lecture, ContentError> {
        let (Some(course), Some(lecture)) = (segment(course), segment(lecture)) else {
            return Err(ContentError::not_found(course, lecture, DocumentKind::Lecture));
        };
        self.reader
            .read_lecture(&course, &lecture)?
            .map(|raw| resolve_lecture(raw, true))
            .ok_or_else(|| ContentError::not_found(&course, &lecture, DocumentKind::Lecture))
    }

    pub fn get_assignment(&self, course: &str, lecture: &str) -> Result<Lecture, ContentError> {
        self.companion(course, lecture, DocumentKind::Assignment, "Assignment")
    }

    pub fn get_practice(&self, course: &str, lecture: &str) -> Result<Lecture, ContentError> {
        self.companion(course, lecture, DocumentKind::Practice, "Practice")
    }

    /// A course-level page (project, resources, practice-all)
    pub fn get_special_page(&self, course: &str, page: SpecialPage) -> Result<Lecture, ContentError> {
        let kind = DocumentKind::Special(page);
        let Some(course) = segment(course) else {
            return Err(ContentError::not_found(course, page.stem(), kind));
        };
        let (front_matter, body) = self
            .reader
            .read_document(&course, kind, "")?
            .ok_or_else(|| ContentError::not_found(&course, page.stem(), kind))?;

        Ok(terminal_document(
            page.stem().to_string(),
            format_title(page.stem()),
            front_matter,
            body,
        ))
    }

    /// A lecture with its neighbours in the full (unfiltered) course order
    pub fn get_navigation(&self, course: &str, lecture: &str) -> Result<Navigation, ContentError> {
        let current = self.get_lecture(course, lecture)?;
        let lectures = self.list_lectures(course, false)?;
        Ok(navigate(current, lectures))
    }

    /// A lecture and its slide deck, cut at the configured boundary
    pub fn slides(&self, course: &str, lecture: &str) -> Result<(Lecture, Vec<Slide>), ContentError> {
        let lecture = self.get_lecture(course, lecture)?;
        let slides = segment_slides(&lecture.content, &lecture.title, self.boundary);
        Ok((lecture, slides))
    }

    fn companion(
        &self,
        course: &str,
        lecture: &str,
        kind: DocumentKind,
        label: &str,
    ) -> Result<Lecture, ContentError> {
        let (Some(course), Some(lecture)) = (segment(course), segment(lecture)) else {
            return Err(ContentError::not_found(course, lecture, kind));
        };
        let (front_matter, body) = self
            .reader
            .read_document(&course, kind, &lecture)?
            .ok_or_else(|| ContentError::not_found(&course, &lecture, kind))?;

        Ok(terminal_document(
            format!("{}.{}", lecture, kind.label()),
            format!("{} - {}", format_title(&lecture), label),
            front_matter,
            body,
        ))
    }
}

/// Decoded slug, or `None` when it would leave its directory
fn segment(slug: &str) -> Option<Cow<'_, str>> {
    let decoded = decode_slug(slug);
    is_path_segment(&decoded).then_some(decoded)
}

/// Lecture-shaped record for documents that have no companions
fn terminal_document(
    slug: String,
    fallback_title: String,
    front_matter: FrontMatter,
    body: String,
) -> Lecture {
    Lecture {
        slug,
        title: front_matter.title.clone().unwrap_or(fallback_title),
        description: front_matter.description.clone(),
        visible: front_matter.is_visible(),
        content: body,
        front_matter,
        has_assignment: false,
        assignment_visible: false,
        has_practice: false,
        practice_visible: false,
    }
}
