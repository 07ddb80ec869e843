//! HATEOAS pagination-link generation for list reads.
//!
//! Links are rebuilt from the conformed query rather than the raw request
//! string, so they always carry the normalized `sort`/`projection`/`limit`/
//! `page` parameters in a stable order.

use serde::{Deserialize, Serialize};

use crate::conform::{ConformedQuery, serialize};

/// The pagination links attached to a list-read envelope.
///
/// Edge links that do not apply (`prev` on the first page, `next` on or
/// past the last) are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: String,
    pub prev: String,
    #[serde(rename = "self")]
    pub current: String,
    pub next: String,
    pub last: String,
}

/// Builds the first/prev/self/next/last links for one page of results.
///
/// `base_url` is the resource URL without any query string. The last page
/// index is `total / limit` (integer division), defined as 0 when `limit`
/// is 0 so a degenerate override cannot divide by zero.
pub fn build_links(
    base_url: &str,
    query: &ConformedQuery,
    page: u64,
    total: u64,
    limit: u64,
) -> PageLinks {
    let last_page = if limit == 0 { 0 } else { total / limit };
    let link = |query: &ConformedQuery| format!("{base_url}?{}", serialize(query));

    PageLinks {
        first: link(&query.with_page(0)),
        prev: if page > 0 {
            link(&query.with_page(page - 1))
        } else {
            String::new()
        },
        current: link(query),
        next: if page < last_page {
            link(&query.with_page(page + 1))
        } else {
            String::new()
        },
        last: link(&query.with_page(last_page)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conform::conform;

    fn query(pairs: &[(&str, &str)]) -> ConformedQuery {
        conform(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn first_page_omits_prev() {
        let links = build_links("http://host/api/resources/projects", &query(&[]), 0, 45, 20);

        assert_eq!(links.prev, "");
        assert_eq!(
            links.first,
            "http://host/api/resources/projects?limit=20&page=0"
        );
        assert_eq!(
            links.next,
            "http://host/api/resources/projects?limit=20&page=1"
        );
        assert_eq!(
            links.last,
            "http://host/api/resources/projects?limit=20&page=2"
        );
        assert_eq!(links.current, links.first);
    }

    #[test]
    fn last_page_omits_next() {
        let q = query(&[("_page", "2")]);
        let links = build_links("http://host/api/resources/projects", &q, 2, 45, 20);

        assert_eq!(links.next, "");
        assert_eq!(
            links.prev,
            "http://host/api/resources/projects?limit=20&page=1"
        );
        assert_eq!(
            links.current,
            "http://host/api/resources/projects?limit=20&page=2"
        );
        assert_eq!(links.last, links.current);
    }

    #[test]
    fn links_carry_sort_and_projection() {
        let q = query(&[("_sort", "title"), ("_limit", "5"), ("_page", "1")]);
        let links = build_links("http://host/api/resources/skills", &q, 1, 12, 5);

        assert_eq!(
            links.next,
            "http://host/api/resources/skills?sort=title&limit=5&page=2"
        );
        assert_eq!(
            links.current,
            "http://host/api/resources/skills?sort=title&limit=5&page=1"
        );
    }

    #[test]
    fn zero_limit_does_not_divide_by_zero() {
        let mut q = query(&[]);
        q.limit = 0;
        let links = build_links("http://host/api/resources/projects", &q, 0, 45, 0);

        assert_eq!(links.next, "");
        assert_eq!(
            links.last,
            "http://host/api/resources/projects?limit=0&page=0"
        );
    }
}
