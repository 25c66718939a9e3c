//! Content module - course documents, lectures and slides

mod error;
mod frontmatter;
mod library;
mod markdown;
mod model;
mod navigation;
mod reader;
mod resolver;
mod slides;
mod slug;
mod store;

pub use error::ContentError;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use library::Library;
pub use markdown::{html_escape, MarkdownRenderer};
pub use model::{Course, Lecture, Navigation, SpecialFiles};
pub use navigation::navigate;
pub use reader::{ContentReader, RawCourse, RawLecture, Sibling};
pub use resolver::{compare_courses, resolve_course, resolve_courses, resolve_lecture, resolve_lectures};
pub use slides::{compile_slides, segment_slides, Slide, SlideBoundary};
pub use slug::{decode_slug, format_title, is_path_segment};
pub use store::{
    DocumentKind, DocumentStore, FsStore, MemoryStore, SpecialPage, COURSE_CONFIG_STEM,
    DEFAULT_EXTENSION, PRIVATE_PREFIX,
};
