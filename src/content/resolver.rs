//! Visibility and ordering rules for courses and lectures.
//!
//! Everything here is pure: raw descriptors in, resolved models out.
//! `respect_visibility` selects between the public view (hidden items
//! removed, companion visibility from the companion documents) and the
//! administrative view (everything listed, companions forced visible).

use std::cmp::Ordering;

use super::model::{Course, Lecture};
use super::reader::{RawCourse, RawLecture};
use super::slug::format_title;

/// Apply title and visibility defaults to a lecture document
pub fn resolve_lecture(raw: RawLecture, respect_visibility: bool) -> Lecture {
    let title = raw
        .front_matter
        .title
        .clone()
        .unwrap_or_else(|| format_title(&raw.slug));

    Lecture {
        title,
        description: raw.front_matter.description.clone(),
        visible: raw.front_matter.is_visible(),
        has_assignment: raw.assignment.exists,
        assignment_visible: !respect_visibility || raw.assignment.visible,
        has_practice: raw.practice.exists,
        practice_visible: !respect_visibility || raw.practice.visible,
        slug: raw.slug,
        content: raw.body,
        front_matter: raw.front_matter,
    }
}

/// Resolve, order by slug, and (optionally) drop hidden lectures
pub fn resolve_lectures(raws: Vec<RawLecture>, respect_visibility: bool) -> Vec<Lecture> {
    let mut lectures: Vec<Lecture> = raws
        .into_iter()
        .map(|raw| resolve_lecture(raw, respect_visibility))
        .collect();

    lectures.sort_by(|a, b| compare_text(&a.slug, &b.slug));

    if respect_visibility {
        lectures.retain(|lecture| lecture.visible);
    }

    lectures
}

/// Merge course config with slug-derived defaults
pub fn resolve_course(raw: RawCourse, lectures: Vec<Lecture>) -> Course {
    let config = raw.config.unwrap_or_default();

    Course {
        title: config.title.clone().unwrap_or_else(|| format_title(&raw.slug)),
        description: config.description.clone(),
        visible: config.is_visible(),
        preview: config.is_preview(),
        order: config.order,
        special_files: raw.special_files,
        lectures,
        slug: raw.slug,
    }
}

/// Course order: explicit `order` ascending, ordered before unordered,
/// then title.
pub fn compare_courses(a: &Course, b: &Course) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_text(&a.title, &b.title),
    }
}

/// Alphabetical order: case only breaks ties, lower case first
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Drop empty courses, sort, then (optionally) drop hidden ones.
///
/// The sort is stable, so courses sharing an `order` keep input order.
pub fn resolve_courses(courses: Vec<Course>, respect_visibility: bool) -> Vec<Course> {
    let mut courses: Vec<Course> = courses
        .into_iter()
        .filter(|course| {
            if course.lectures.is_empty() {
                tracing::debug!("Dropping course {} with no lectures", course.slug);
                return false;
            }
            true
        })
        .collect();

    courses.sort_by(compare_courses);

    if respect_visibility {
        courses.retain(|course| course.visible);
    }

    courses
}
