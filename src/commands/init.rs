//! Initialize a new course site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: Courses
subtitle: ''
description: ''
author: ''
language: en

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: courses
public_dir: public

# Documents
content:
  extension: mdx

# Slides start at every `##` heading; use h2-h3 to also split at `###`
slides:
  boundary: h2

highlight:
  theme: base16-ocean.dark
  line_number: true
"#;

const COURSE: &str = r#"---
title: Getting Started
description: A sample course to show how content is laid out
order: 1
---
"#;

const LECTURE: &str = r#"---
title: Welcome
description: How lectures, slides and assignments fit together
tags: [intro]
---

# Welcome

Every file in a course directory is a lecture. Files are ordered by name,
so prefix them with numbers.

## Slides

Each `##` heading starts a new slide. Open the slides view to present
this lecture.

## Companion documents

`01-welcome.assignment.mdx` and `01-welcome.practice.mdx` belong to this
lecture. Set `visible: false` in their front-matter to hide them.

```mermaid
graph LR
  Lecture --> Assignment
  Lecture --> Practice
```
"#;

const ASSIGNMENT: &str = r#"---
title: Your First Assignment
---

Create a new lecture with `lectern new getting-started "Second Lecture"`.
"#;

const RESOURCES: &str = r#"---
title: Resources
---

- [Markdown guide](https://commonmark.org/help/)
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let course_dir = target_dir.join("courses/getting-started");
    fs::create_dir_all(&course_dir)?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG)?;
    write_if_missing(&course_dir.join("_course.mdx"), COURSE)?;
    write_if_missing(&course_dir.join("01-welcome.mdx"), LECTURE)?;
    write_if_missing(&course_dir.join("01-welcome.assignment.mdx"), ASSIGNMENT)?;
    write_if_missing(&course_dir.join("resources.mdx"), RESOURCES)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Skipping existing file: {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created: {:?}", path);
    Ok(())
}
