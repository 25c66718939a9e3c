//! Content errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::store::DocumentKind;

#[derive(Debug, Error)]
pub enum ContentError {
    /// The requested document does not exist
    #[error("{} not found: {course}/{slug}", .kind.label())]
    NotFound {
        course: String,
        slug: String,
        kind: DocumentKind,
    },

    /// No course with that slug, or it has no lectures to show
    #[error("course not found: {course}")]
    CourseNotFound { course: String },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    pub fn not_found(course: &str, slug: &str, kind: DocumentKind) -> Self {
        ContentError::NotFound {
            course: course.to_string(),
            slug: slug.to_string(),
            kind,
        }
    }

    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::NotFound { .. } | ContentError::CourseNotFound { .. }
        )
    }
}
