/// Page visibility for a set of active strands
use crate::course::{Page, Topic};

/// Label that opens a page to everyone
pub const WILDCARD: &str = "*";

/// Who a page is declared for, derived from its `strand` and `exceptions`.
///
/// Rules:
/// 1. No `strand` labels → shown to nobody, wildcard holders included
/// 2. `strand` contains `*` and there are no exceptions → shown to everyone
/// 3. `strand` contains `*` with exceptions → shown unless an active strand
///    is an exception
/// 4. Otherwise → shown iff an active strand is one of the page's strands
///
/// Rules 3 and 4 never combine: a wildcard page with a matching exception
/// stays hidden even when another active strand is listed in `strand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience<'a> {
    NoAudience,
    WildcardOpen,
    WildcardWithExceptions(&'a [String]),
    Restricted(&'a [String]),
}

impl<'a> Audience<'a> {
    pub fn of(page: &'a Page) -> Audience<'a> {
        if page.strand.is_empty() {
            Audience::NoAudience
        } else if page.strand.iter().any(|s| s == WILDCARD) {
            if page.exceptions.is_empty() {
                Audience::WildcardOpen
            } else {
                Audience::WildcardWithExceptions(&page.exceptions)
            }
        } else {
            Audience::Restricted(&page.strand)
        }
    }

    pub fn admits<S: AsRef<str>>(&self, active: &[S]) -> bool {
        match self {
            Audience::NoAudience => false,
            Audience::WildcardOpen => true,
            Audience::WildcardWithExceptions(exceptions) => !intersects(active, exceptions),
            Audience::Restricted(strands) => intersects(active, strands),
        }
    }
}

fn intersects<S: AsRef<str>>(active: &[S], labels: &[String]) -> bool {
    active
        .iter()
        .any(|a| labels.iter().any(|label| label == a.as_ref()))
}

pub fn is_page_visible<S: AsRef<str>>(page: &Page, active: &[S]) -> bool {
    Audience::of(page).admits(active)
}

/// Keep only visible pages, dropping topics left empty. Order is preserved.
pub fn filter_topics<S: AsRef<str>>(topics: &[Topic], active: &[S]) -> Vec<Topic> {
    topics
        .iter()
        .filter_map(|topic| {
            let pages: Vec<Page> = topic
                .pages
                .iter()
                .filter(|page| is_page_visible(page, active))
                .cloned()
                .collect();

            if pages.is_empty() {
                None
            } else {
                Some(Topic {
                    name: topic.name.clone(),
                    id: topic.id.clone(),
                    isadaptive: topic.isadaptive,
                    pages,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn topic(id: &str, pages: Vec<Page>) -> Topic {
        Topic {
            name: format!("Topic {}", id),
            id: id.to_string(),
            isadaptive: false,
            pages,
        }
    }

    #[test]
    fn test_audience_classification() {
        let empty = Page::new("p", &[], &["B"]);
        let open = Page::new("p", &["*"], &[]);
        let carved = Page::new("p", &["A", "*"], &["B"]);
        let restricted = Page::new("p", &["A", "B"], &["C"]);

        assert_eq!(Audience::of(&empty), Audience::NoAudience);
        assert_eq!(Audience::of(&open), Audience::WildcardOpen);
        assert!(matches!(
            Audience::of(&carved),
            Audience::WildcardWithExceptions(e) if e.len() == 1 && e[0] == "B"
        ));
        assert!(matches!(
            Audience::of(&restricted),
            Audience::Restricted(s) if s.len() == 2
        ));
    }

    #[test]
    fn test_no_audience_hidden_from_everyone() {
        let page = Page::new("p", &[], &[]);

        assert!(!is_page_visible(&page, &NONE));
        assert!(!is_page_visible(&page, &["*"]));
        assert!(!is_page_visible(&page, &["A", "B", "*"]));
    }

    #[test]
    fn test_no_audience_ignores_exceptions() {
        let page = Page::new("p", &[], &["B"]);
        assert!(!is_page_visible(&page, &["A"]));
    }

    #[test]
    fn test_wildcard_open_to_all() {
        let page = Page::new("p", &["*"], &[]);

        assert!(is_page_visible(&page, &NONE));
        assert!(is_page_visible(&page, &["A"]));
        assert!(is_page_visible(&page, &["Z", "Y"]));
    }

    #[test]
    fn test_wildcard_with_exceptions() {
        let page = Page::new("p", &["*"], &["B"]);

        assert!(is_page_visible(&page, &["A"]));
        assert!(!is_page_visible(&page, &["B"]));
        assert!(is_page_visible(&page, &NONE));
    }

    #[test]
    fn test_exception_wins_over_listed_strand() {
        let page = Page::new("p", &["*", "A"], &["B"]);

        assert!(!is_page_visible(&page, &["A", "B"]));
    }

    #[test]
    fn test_restricted_needs_intersection() {
        let page = Page::new("p", &["A", "B"], &[]);

        assert!(!is_page_visible(&page, &["C"]));
        assert!(is_page_visible(&page, &["B"]));
        assert!(is_page_visible(&page, &["C", "A"]));
        assert!(!is_page_visible(&page, &NONE));
    }

    #[test]
    fn test_restricted_ignores_exceptions() {
        let page = Page::new("p", &["A"], &["A"]);
        assert!(is_page_visible(&page, &["A"]));
    }

    #[test]
    fn test_wildcard_label_is_not_a_pass() {
        let page = Page::new("p", &["A"], &[]);
        assert!(!is_page_visible(&page, &["*"]));
    }

    #[test]
    fn test_duplicate_active_strands_harmless() {
        let page = Page::new("p", &["A"], &[]);
        assert!(is_page_visible(&page, &["A", "A"]));
    }

    #[test]
    fn test_accepts_owned_strings() {
        let page = Page::new("p", &["A"], &[]);
        let active = vec!["A".to_string()];

        assert!(is_page_visible(&page, &active));
    }

    #[test]
    fn test_filter_keeps_visible_pages_in_order() {
        let topics = vec![topic(
            "t1",
            vec![
                Page::new("first", &["A"], &[]),
                Page::new("second", &["B"], &[]),
            ],
        )];

        let filtered = filter_topics(&topics, &["A"]);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].pages.len(), 1);
        assert_eq!(filtered[0].pages[0].file, "first");
        assert_eq!(filtered[0].name, "Topic t1");
    }

    #[test]
    fn test_filter_drops_empty_topics() {
        let topics = vec![
            topic("t1", vec![Page::new("a", &["A"], &[])]),
            topic("t2", vec![Page::new("b", &["B"], &[])]),
            topic("t3", Vec::new()),
            topic("t4", vec![Page::new("c", &["*"], &[]), Page::new("d", &["A"], &[])]),
        ];

        let filtered = filter_topics(&topics, &["A"]);

        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t4"]);
        assert!(filtered.iter().all(|t| !t.pages.is_empty()));
        let files: Vec<&str> = filtered[1].pages.iter().map(|p| p.file.as_str()).collect();
        assert_eq!(files, vec!["c", "d"]);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let topics = vec![topic(
            "t1",
            vec![Page::new("a", &["A"], &[]), Page::new("b", &["B"], &[])],
        )];
        let before = topics.clone();

        let _ = filter_topics(&topics, &["B"]);

        assert_eq!(topics, before);
    }

    #[test]
    fn test_filter_with_no_active_strands() {
        let topics = vec![
            topic("t1", vec![Page::new("a", &["A"], &[])]),
            topic("t2", vec![Page::new("b", &["*"], &["A"])]),
        ];

        let filtered = filter_topics(&topics, &NONE);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "t2");
    }
}
