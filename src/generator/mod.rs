//! Generator module - writes the static site using the built-in Tera templates

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::content::{compile_slides, Course, DocumentStore, Lecture, Library, SpecialPage};
use crate::helpers::{lecture_url, url_for};
use crate::templates::{CourseRef, LinkData, Pages};
use crate::Site;

/// Static site generator
pub struct Generator {
    site: Site,
    pages: Pages,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            pages: Pages::new(&site.config)?,
        })
    }

    /// Generate the entire site, returning the number of pages written
    pub async fn generate(&self) -> Result<usize> {
        fs::create_dir_all(&self.site.public_dir)?;
        let library = self.site.library();

        // The home page and catalog only show what visitors may see
        let published = library.list_courses(true)?;
        self.write_page(Path::new("index.html"), &self.pages.index(&published)?)?;
        self.write_catalog(&published)?;
        let mut written = 1;

        // Every other page is generated, hidden content included
        for course in library.list_courses(false)? {
            self.copy_course_assets(&library, &course.slug)?;
            written += self.generate_course(&library, &course).await?;
        }

        Ok(written)
    }

    async fn generate_course<S: DocumentStore>(
        &self,
        library: &Library<S>,
        course: &Course,
    ) -> Result<usize> {
        let course_ref = CourseRef {
            slug: course.slug.clone(),
            title: course.title.clone(),
        };
        let course_dir = PathBuf::from("courses").join(&course.slug);
        let mut written = 0;

        for lecture in &course.lectures {
            let lecture_dir = course_dir.join(&lecture.slug);

            let navigation = library.get_navigation(&course.slug, &lecture.slug)?;
            self.write_page(
                &lecture_dir.join("index.html"),
                &self.pages.lecture(&course_ref, &navigation)?,
            )?;
            self.write_page(
                &lecture_dir.join("presentation/index.html"),
                &self.pages.presentation(&course_ref, &navigation.current)?,
            )?;

            let (current, slides) = library.slides(&course.slug, &lecture.slug)?;
            let slides = compile_slides(self.pages.markdown(), slides).await?;
            self.write_page(
                &PathBuf::from("slides")
                    .join(&course.slug)
                    .join(&lecture.slug)
                    .join("index.html"),
                &self.pages.slides(&course.slug, &current, &slides)?,
            )?;
            written += 3;

            let back = LinkData {
                title: "Back to Lecture".to_string(),
                url: lecture_url(&self.site.config, &course.slug, &lecture.slug),
            };

            if lecture.has_assignment {
                let assignment = library.get_assignment(&course.slug, &lecture.slug)?;
                let html = self.pages.document(&course_ref, &assignment, &back)?;
                self.write_page(&lecture_dir.join("assignment/index.html"), &html)?;
                self.write_page(
                    &PathBuf::from("assignments")
                        .join(&course.slug)
                        .join(&lecture.slug)
                        .join("index.html"),
                    &html,
                )?;
                written += 2;
            }

            if lecture.has_practice {
                let practice = library.get_practice(&course.slug, &lecture.slug)?;
                self.write_page(
                    &lecture_dir.join("practice/index.html"),
                    &self.pages.document(&course_ref, &practice, &back)?,
                )?;
                written += 1;
            }
        }

        written += self.generate_special_pages(library, course, &course_ref, &course_dir)?;

        tracing::debug!("Generated course {} ({} lectures)", course.slug, course.lectures.len());
        Ok(written)
    }

    fn generate_special_pages<S: DocumentStore>(
        &self,
        library: &Library<S>,
        course: &Course,
        course_ref: &CourseRef,
        course_dir: &Path,
    ) -> Result<usize> {
        let back = LinkData {
            title: "Back to Courses".to_string(),
            url: url_for(&self.site.config, "/"),
        };
        let mut written = 0;

        // Hidden pages stay reachable by URL, as the server serves them
        for page in SpecialPage::ALL {
            let document: Lecture = match library.get_special_page(&course.slug, page) {
                Ok(document) => document,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e.into()),
            };
            self.write_page(
                &course_dir.join(page.stem()).join("index.html"),
                &self.pages.document(course_ref, &document, &back)?,
            )?;
            written += 1;
        }

        Ok(written)
    }

    /// Write `courses.json`, the public course catalog
    fn write_catalog(&self, courses: &[Course]) -> Result<()> {
        let output_path = self.site.public_dir.join("courses.json");
        fs::write(
            &output_path,
            serde_json::to_string_pretty(&self.pages.catalog(courses))?,
        )?;
        tracing::info!("Generated courses.json");

        Ok(())
    }

    /// Copy non-document files of a course to `content/<course>/`
    fn copy_course_assets<S: DocumentStore>(&self, library: &Library<S>, course: &str) -> Result<()> {
        let source_dir = self.site.content_dir.join(course);
        let extension = library.reader().extension();

        for entry in WalkDir::new(&source_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                continue;
            }

            let relative = path.strip_prefix(&source_dir)?;
            let dest = self.site.public_dir.join("content").join(course).join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            tracing::debug!("Copied: {:?}", dest);
        }

        Ok(())
    }

    fn write_page(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}
