//! List site content

use anyhow::Result;

use crate::Site;

/// What to list, and under which rules
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub course: Option<String>,
    pub lecture: Option<String>,
    /// Include hidden courses and lectures
    pub all: bool,
}

/// Render the listing for `content_type` as lines of text
pub fn listing(site: &Site, content_type: &str, options: &ListOptions) -> Result<Vec<String>> {
    let library = site.library();
    let respect_visibility = !options.all;
    let mut lines = Vec::new();

    match content_type {
        "course" | "courses" => {
            let courses = library.list_courses(respect_visibility)?;
            lines.push(format!("Courses ({}):", courses.len()));
            for course in courses {
                let mut flags = Vec::new();
                if course.preview {
                    flags.push("preview");
                }
                if !course.visible {
                    flags.push("hidden");
                }
                lines.push(format!(
                    "  {} - {} lectures [{}]{}",
                    course.title,
                    course.lectures.len(),
                    course.slug,
                    flag_suffix(&flags)
                ));
            }
        }
        "lecture" | "lectures" => {
            let Some(course) = options.course.as_deref() else {
                anyhow::bail!("Listing lectures needs --course");
            };
            let lectures = library.list_lectures(course, respect_visibility)?;
            lines.push(format!("Lectures in {} ({}):", course, lectures.len()));
            for lecture in lectures {
                let mut flags = Vec::new();
                if lecture.has_assignment {
                    flags.push(if lecture.assignment_visible {
                        "assignment"
                    } else {
                        "hidden assignment"
                    });
                }
                if lecture.has_practice {
                    flags.push(if lecture.practice_visible {
                        "practice"
                    } else {
                        "hidden practice"
                    });
                }
                if !lecture.visible {
                    flags.push("hidden");
                }
                lines.push(format!(
                    "  {} [{}]{}",
                    lecture.title,
                    lecture.slug,
                    flag_suffix(&flags)
                ));
            }
        }
        "slide" | "slides" => {
            let (Some(course), Some(lecture)) =
                (options.course.as_deref(), options.lecture.as_deref())
            else {
                anyhow::bail!("Listing slides needs --course and --lecture");
            };
            let (lecture, slides) = library.slides(course, lecture)?;
            lines.push(format!("Slides in {} ({}):", lecture.title, slides.len()));
            for slide in slides {
                lines.push(format!("  {:>3}. {}", slide.index, slide.title));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: courses, lectures, slides",
                content_type
            );
        }
    }

    Ok(lines)
}

fn flag_suffix(flags: &[&str]) -> String {
    if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    }
}

/// List site content by type
pub fn run(site: &Site, content_type: &str, options: &ListOptions) -> Result<()> {
    for line in listing(site, content_type, options)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "courses/sql/_course.mdx", "---\ntitle: SQL\npreview: true\n---\n");
        write(root, "courses/sql/01-select.mdx", "## From\nfrom\n## Where\nwhere");
        write(root, "courses/sql/01-select.assignment.mdx", "---\nvisible: false\n---\n");
        write(root, "courses/sql/02-draft.mdx", "---\nvisible: false\n---\nDraft");
        write(root, "courses/old/_course.mdx", "---\nvisible: false\n---\n");
        write(root, "courses/old/intro.mdx", "Intro");
        let site = Site::new(root).unwrap();
        (dir, site)
    }

    #[test]
    fn test_list_courses() {
        let (_dir, site) = site();
        let lines = listing(&site, "courses", &ListOptions::default()).unwrap();
        assert_eq!(lines, vec!["Courses (1):", "  SQL - 1 lectures [sql] (preview)"]);

        let all = ListOptions {
            all: true,
            ..ListOptions::default()
        };
        let lines = listing(&site, "courses", &all).unwrap();
        assert_eq!(lines[0], "Courses (2):");
        assert!(lines.contains(&"  Old - 1 lectures [old] (hidden)".to_string()));
    }

    #[test]
    fn test_list_lectures() {
        let (_dir, site) = site();
        let options = ListOptions {
            course: Some("sql".to_string()),
            all: true,
            ..ListOptions::default()
        };
        let lines = listing(&site, "lectures", &options).unwrap();
        assert_eq!(
            lines,
            vec![
                "Lectures in sql (2):",
                "  01 Select [01-select] (assignment)",
                "  02 Draft [02-draft] (hidden)",
            ]
        );

        let options = ListOptions {
            all: false,
            ..options
        };
        let lines = listing(&site, "lectures", &options).unwrap();
        assert_eq!(
            lines,
            vec![
                "Lectures in sql (1):",
                "  01 Select [01-select] (hidden assignment)",
            ]
        );
    }

    #[test]
    fn test_list_slides() {
        let (_dir, site) = site();
        let options = ListOptions {
            course: Some("sql".to_string()),
            lecture: Some("01-select".to_string()),
            all: false,
        };
        let lines = listing(&site, "slides", &options).unwrap();
        assert_eq!(
            lines,
            vec![
                "Slides in 01 Select (3):",
                "    0. 01 Select",
                "    1. From",
                "    2. Where",
            ]
        );
    }

    #[test]
    fn test_missing_arguments() {
        let (_dir, site) = site();
        assert!(listing(&site, "lectures", &ListOptions::default()).is_err());
        assert!(listing(&site, "slides", &ListOptions::default()).is_err());
        assert!(listing(&site, "tags", &ListOptions::default()).is_err());
    }
}
