//! lectern: course, lecture and slide pages from a directory of documents
//!
//! Courses live in subdirectories of a content root; each lecture is a
//! front-matter document, optionally paired with assignment and practice
//! documents. The [`content`] module resolves them into courses, lectures,
//! navigation and slide decks; the rest of the crate renders those as a
//! static site or serves them over HTTP.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{FsStore, Library};

/// The main site handle
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content root holding one directory per course
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(base_dir.join("_config.yml"))?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Content library over the content directory
    pub fn library(&self) -> Library<FsStore> {
        Library::with_options(
            FsStore::new(&self.content_dir),
            &self.config.content.extension,
            self.config.slides.boundary,
        )
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
