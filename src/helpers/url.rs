//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;
use crate::content::SpecialPage;

/// Characters escaped in a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/slides/sql/select") // -> "/learn/slides/sql/select"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Prefix a URL built by the helpers here with the site domain
pub fn full_url_for(config: &SiteConfig, url: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}/{}", base, url.trim_start_matches('/'))
}

/// Escape one path segment; `C#` becomes `C%23`
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

pub fn lecture_url(config: &SiteConfig, course: &str, lecture: &str) -> String {
    url_for(
        config,
        &format!(
            "courses/{}/{}",
            encode_segment(course),
            encode_segment(lecture)
        ),
    )
}

pub fn assignment_url(config: &SiteConfig, course: &str, lecture: &str) -> String {
    format!("{}/assignment", lecture_url(config, course, lecture))
}

pub fn practice_url(config: &SiteConfig, course: &str, lecture: &str) -> String {
    format!("{}/practice", lecture_url(config, course, lecture))
}

pub fn presentation_url(config: &SiteConfig, course: &str, lecture: &str) -> String {
    format!("{}/presentation", lecture_url(config, course, lecture))
}

pub fn slides_url(config: &SiteConfig, course: &str, lecture: &str) -> String {
    url_for(
        config,
        &format!(
            "slides/{}/{}",
            encode_segment(course),
            encode_segment(lecture)
        ),
    )
}

pub fn special_url(config: &SiteConfig, course: &str, page: SpecialPage) -> String {
    url_for(
        config,
        &format!("courses/{}/{}", encode_segment(course), page.stem()),
    )
}
