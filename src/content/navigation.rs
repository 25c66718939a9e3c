//! Previous/next lecture resolution

use super::model::{Lecture, Navigation};

/// Place `current` among `lectures` (already in course order).
///
/// When the current lecture is not in the list, only `current` is set.
pub fn navigate(current: Lecture, mut lectures: Vec<Lecture>) -> Navigation {
    let Some(index) = lectures.iter().position(|l| l.slug == current.slug) else {
        tracing::debug!("Lecture {} not in course order, no neighbours", current.slug);
        return Navigation {
            current,
            next: None,
            previous: None,
            materials_url: None,
        };
    };

    let next = (index + 1 < lectures.len()).then(|| lectures.swap_remove(index + 1));
    let previous = index.checked_sub(1).map(|i| lectures.swap_remove(i));
    let materials_url = current.materials_url().map(str::to_string);

    Navigation {
        current,
        next,
        previous,
        materials_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::frontmatter::FrontMatter;

    fn lecture(slug: &str) -> Lecture {
        Lecture {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            description: None,
            content: String::new(),
            front_matter: FrontMatter::default(),
            has_assignment: false,
            assignment_visible: true,
            has_practice: false,
            practice_visible: true,
            visible: true,
        }
    }

    fn course() -> Vec<Lecture> {
        vec![lecture("a"), lecture("b"), lecture("c")]
    }

    fn slug(lecture: &Option<Lecture>) -> Option<&str> {
        lecture.as_ref().map(|l| l.slug.as_str())
    }

    #[test]
    fn test_middle() {
        let nav = navigate(lecture("b"), course());
        assert_eq!(slug(&nav.previous), Some("a"));
        assert_eq!(slug(&nav.next), Some("c"));
    }

    #[test]
    fn test_first_has_no_previous() {
        let nav = navigate(lecture("a"), course());
        assert_eq!(slug(&nav.previous), None);
        assert_eq!(slug(&nav.next), Some("b"));
    }

    #[test]
    fn test_last_has_no_next() {
        let nav = navigate(lecture("c"), course());
        assert_eq!(slug(&nav.previous), Some("b"));
        assert_eq!(slug(&nav.next), None);
    }

    #[test]
    fn test_only_lecture() {
        let nav = navigate(lecture("a"), vec![lecture("a")]);
        assert!(nav.previous.is_none());
        assert!(nav.next.is_none());
    }

    #[test]
    fn test_absent_from_list() {
        let mut current = lecture("x");
        current.front_matter.materials_url = Some("https://example.com".to_string());
        let nav = navigate(current, course());
        assert_eq!(nav.current.slug, "x");
        assert!(nav.previous.is_none());
        assert!(nav.next.is_none());
        assert!(nav.materials_url.is_none());
    }

    #[test]
    fn test_materials_url_passthrough() {
        let mut current = lecture("b");
        current.front_matter.materials_url = Some("https://example.com/b.pdf".to_string());
        let nav = navigate(current, course());
        assert_eq!(nav.materials_url.as_deref(), Some("https://example.com/b.pdf"));
    }
}
