//! Create a new lecture, companion document or course

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::{DocumentKind, DocumentStore};
use crate::Site;

/// Create a document of `kind` in `course`.
///
/// For lectures `title` becomes the slug; for assignments and practice it
/// names the lecture they belong to; for courses it is the course title.
pub fn create_document(site: &Site, course: &str, title: &str, kind: &str) -> Result<PathBuf> {
    let extension = &site.config.content.extension;
    let course_dir = site.content_dir.join(course);
    let slug = slug::slugify(title);
    let quoted = yaml_scalar(title)?;

    let (file_name, content) = match kind {
        "lecture" => (
            DocumentKind::Lecture.file_name(&slug, extension),
            format!("---\ntitle: {}\ndescription: ''\n---\n\n## {}\n", quoted, title),
        ),
        "assignment" | "practice" => {
            let kind = if kind == "assignment" {
                DocumentKind::Assignment
            } else {
                DocumentKind::Practice
            };
            let lecture = DocumentKind::Lecture.file_name(&slug, extension);
            if !site.library().reader().store().exists(course, &lecture) {
                tracing::warn!("No lecture {}/{} yet for this {}", course, slug, kind.label());
            }
            (
                kind.file_name(&slug, extension),
                format!("---\nvisible: true\n---\n\n## {}\n", title),
            )
        }
        "course" => (
            DocumentKind::CourseConfig.file_name("", extension),
            format!("---\ntitle: {}\ndescription: ''\nvisible: true\n---\n", quoted),
        ),
        _ => {
            anyhow::bail!(
                "Unknown kind: {}. Available: lecture, assignment, practice, course",
                kind
            );
        }
    };

    fs::create_dir_all(&course_dir)?;
    let file_path = course_dir.join(file_name);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// `value` as a YAML scalar, quoted when needed
fn yaml_scalar(value: &str) -> Result<String> {
    Ok(serde_yaml::to_string(value)?.trim_end().to_string())
}

/// Run the new command
pub fn run(site: &Site, course: &str, title: &str, kind: Option<&str>) -> Result<()> {
    create_document(site, course, title, kind.unwrap_or("lecture"))?;
    Ok(())
}
