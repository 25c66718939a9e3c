//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. [`Pages`] turns resolved content
//! into full HTML pages; the generator and the server share it.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Course, Lecture, MarkdownRenderer, Navigation, Slide};
use crate::helpers::{
    assignment_url, full_url_for, lecture_url, practice_url, presentation_url, slides_url,
    special_url, url_for,
};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Pages embed pre-rendered HTML; user text is escaped in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("lecture.html", include_str!("site/lecture.html")),
            ("document.html", include_str!("site/document.html")),
            ("presentation.html", include_str!("site/presentation.html")),
            ("slides.html", include_str!("site/slides.html")),
            ("not_found.html", include_str!("site/not_found.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseData {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub preview: bool,
    pub visible: bool,
    pub lectures: Vec<LectureData>,
    /// Special pages, in display order
    pub pages: Vec<LinkData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LectureData {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub visible: bool,
    pub url: String,
    pub slides_url: String,
    pub presentation_url: String,
    /// Only set when the assignment exists and is visible
    pub assignment_url: Option<String>,
    pub practice_url: Option<String>,
    pub materials_url: Option<String>,
    pub code_url: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkData {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseRef {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub title: String,
    pub description: Option<String>,
}

/// Full-page renderer shared by `generate` and `server`
pub struct Pages {
    config: SiteConfig,
    templates: TemplateRenderer,
    markdown: Arc<MarkdownRenderer>,
}

impl Pages {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            templates: TemplateRenderer::new()?,
            markdown: Arc::new(MarkdownRenderer::with_config(&config.highlight)),
        })
    }

    /// Shared markdown renderer, for slide compilation
    pub fn markdown(&self) -> Arc<MarkdownRenderer> {
        Arc::clone(&self.markdown)
    }

    pub fn course_data(&self, course: &Course) -> CourseData {
        CourseData {
            slug: course.slug.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            preview: course.preview,
            visible: course.visible,
            lectures: course
                .lectures
                .iter()
                .map(|lecture| self.lecture_data(&course.slug, lecture))
                .collect(),
            pages: course
                .special_files
                .pages()
                .into_iter()
                .map(|page| LinkData {
                    title: crate::content::format_title(page.stem()),
                    url: special_url(&self.config, &course.slug, page),
                })
                .collect(),
        }
    }

    pub fn lecture_data(&self, course: &str, lecture: &Lecture) -> LectureData {
        LectureData {
            slug: lecture.slug.clone(),
            title: lecture.title.clone(),
            description: lecture.description.clone(),
            visible: lecture.visible,
            url: lecture_url(&self.config, course, &lecture.slug),
            slides_url: slides_url(&self.config, course, &lecture.slug),
            presentation_url: presentation_url(&self.config, course, &lecture.slug),
            assignment_url: lecture
                .shows_assignment()
                .then(|| assignment_url(&self.config, course, &lecture.slug)),
            practice_url: lecture
                .shows_practice()
                .then(|| practice_url(&self.config, course, &lecture.slug)),
            materials_url: lecture.materials_url().map(str::to_string),
            code_url: lecture.code_url().map(str::to_string),
            tags: lecture.tags().to_vec(),
        }
    }

    /// JSON catalog of `courses` with absolute lecture URLs
    pub fn catalog(&self, courses: &[Course]) -> serde_json::Value {
        let catalog: Vec<serde_json::Value> = courses
            .iter()
            .map(|course| {
                let data = self.course_data(course);
                let lectures: Vec<serde_json::Value> = data
                    .lectures
                    .iter()
                    .map(|lecture| {
                        serde_json::json!({
                            "slug": lecture.slug,
                            "title": lecture.title,
                            "description": lecture.description,
                            "url": full_url_for(&self.config, &lecture.url),
                            "hasAssignment": lecture.assignment_url.is_some(),
                            "hasPractice": lecture.practice_url.is_some(),
                            "tags": lecture.tags,
                        })
                    })
                    .collect();

                serde_json::json!({
                    "slug": data.slug,
                    "title": data.title,
                    "description": data.description,
                    "preview": data.preview,
                    "order": course.order,
                    "lectures": lectures,
                })
            })
            .collect();

        serde_json::Value::Array(catalog)
    }

    /// Home page listing `courses`
    pub fn index(&self, courses: &[Course]) -> Result<String> {
        let courses: Vec<CourseData> = courses.iter().map(|c| self.course_data(c)).collect();

        let mut context = self.base_context();
        context.insert("courses", &courses);
        self.templates.render("index.html", &context)
    }

    /// Lecture page with its rendered body and neighbours
    pub fn lecture(&self, course: &CourseRef, navigation: &Navigation) -> Result<String> {
        let lecture = &navigation.current;
        let content = self.markdown.render(&lecture.content)?;
        let link = |l: &Lecture| LinkData {
            title: l.title.clone(),
            url: lecture_url(&self.config, &course.slug, &l.slug),
        };

        let mut context = self.content_context(&content);
        context.insert("page_description", &lecture.description);
        context.insert("course", course);
        context.insert("lecture", &self.lecture_data(&course.slug, lecture));
        context.insert("previous", &navigation.previous.as_ref().map(link));
        context.insert("next", &navigation.next.as_ref().map(link));
        context.insert("materials_url", &navigation.materials_url);
        self.templates.render("lecture.html", &context)
    }

    /// Assignment, practice or course-level page
    pub fn document(&self, course: &CourseRef, document: &Lecture, back: &LinkData) -> Result<String> {
        let content = self.markdown.render(&document.content)?;

        let mut context = self.content_context(&content);
        context.insert("page_description", &document.description);
        context.insert("course", course);
        context.insert(
            "document",
            &DocumentData {
                title: document.title.clone(),
                description: document.description.clone(),
            },
        );
        context.insert("back", back);
        self.templates.render("document.html", &context)
    }

    /// Whole lecture on one page
    pub fn presentation(&self, course: &CourseRef, lecture: &Lecture) -> Result<String> {
        let content = self.markdown.render(&lecture.content)?;

        let mut context = self.content_context(&content);
        context.insert("page_description", &lecture.description);
        context.insert("course", course);
        context.insert("lecture", &self.lecture_data(&course.slug, lecture));
        self.templates.render("presentation.html", &context)
    }

    /// Slide deck; `slides` must already be compiled
    pub fn slides(&self, course: &str, lecture: &Lecture, slides: &[Slide]) -> Result<String> {
        let has_mermaid = slides
            .iter()
            .filter_map(|slide| slide.html.as_deref())
            .any(has_mermaid);

        let mut context = self.base_context();
        context.insert("has_mermaid", &has_mermaid);
        context.insert("page_description", &lecture.description);
        context.insert("lecture", &self.lecture_data(course, lecture));
        context.insert("slides", slides);
        self.templates.render("slides.html", &context)
    }

    pub fn not_found(&self, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", message);
        self.templates.render("not_found.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: self.config.title.clone(),
                subtitle: self.config.subtitle.clone(),
                description: self.config.description.clone(),
                author: self.config.author.clone(),
                language: self.config.language.clone(),
            },
        );
        context.insert("home_url", &url_for(&self.config, "/"));
        context.insert("page_description", &None::<String>);
        context.insert("has_mermaid", &false);
        context
    }

    fn content_context(&self, content: &str) -> Context {
        let mut context = self.base_context();
        context.insert("content", content);
        context.insert("has_mermaid", &has_mermaid(content));
        context
    }
}

fn has_mermaid(html: &str) -> bool {
    html.contains(r#"<pre class="mermaid">"#)
}
