//! Page-number pagination primitives shared by the recipe backend endpoints.
//!
//! A [`PageRequest`] captures the validated `page`/`limit` pair supplied by a
//! client. Once the adapter has fetched one page of rows together with the
//! total row count, [`Page::new`] wraps them in the `{count, next, previous,
//! results}` envelope, deriving the neighbour links from the request URL.

mod request;

pub use request::{DEFAULT_LIMIT, MAX_LIMIT, PageRequest, PaginationError};

use serde::Serialize;
use url::Url;

/// Paginated response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of items across every page.
    pub count: u64,
    /// Absolute link to the following page, when one exists.
    pub next: Option<String>,
    /// Absolute link to the preceding page, when one exists.
    pub previous: Option<String>,
    /// Items on the current page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build an envelope for `results` fetched with `request`.
    ///
    /// `base` is the URL the client called; every query parameter other than
    /// `page` is preserved in the neighbour links.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{Page, PageRequest};
    /// use url::Url;
    ///
    /// let request = PageRequest::new(Some(2), Some(2)).expect("valid request");
    /// let base = Url::parse("http://localhost/api/v1/recipes?limit=2&page=2").expect("url");
    /// let page = Page::new(vec!["c", "d"], 5, request, &base);
    ///
    /// assert_eq!(page.count, 5);
    /// assert_eq!(
    ///     page.next.as_deref(),
    ///     Some("http://localhost/api/v1/recipes?limit=2&page=3")
    /// );
    /// assert_eq!(
    ///     page.previous.as_deref(),
    ///     Some("http://localhost/api/v1/recipes?limit=2")
    /// );
    /// ```
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, request: PageRequest, base: &Url) -> Self {
        let next = request
            .has_next(count)
            .then(|| page_link(base, Some(request.page() + 1)));
        let previous = (request.page() > 1).then(|| {
            let previous_page = request.page() - 1;
            // The first page is addressed without an explicit `page` parameter.
            page_link(base, (previous_page > 1).then_some(previous_page))
        });
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform every item while keeping the envelope metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn page_link(base: &Url, page: Option<u32>) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_query(None);
    if !retained.is_empty() || page.is_some() {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if let Some(number) = page {
            pairs.append_pair("page", &number.to_string());
        }
    }
    link.into()
}

#[cfg(test)]
mod tests {
    //! Envelope link construction.

    use super::*;
    use rstest::rstest;

    fn base(query: &str) -> Url {
        Url::parse(&format!("http://example.test/api/v1/recipes{query}")).expect("valid url")
    }

    #[rstest]
    fn single_page_has_no_links() {
        let request = PageRequest::default();
        let page = Page::new(vec![1, 2, 3], 3, request, &base(""));

        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert_eq!(page.results, vec![1, 2, 3]);
    }

    #[rstest]
    fn first_page_links_to_second() {
        let request = PageRequest::new(None, Some(2)).expect("valid request");
        let page = Page::new(vec![1, 2], 3, request, &base("?limit=2"));

        assert_eq!(
            page.next.as_deref(),
            Some("http://example.test/api/v1/recipes?limit=2&page=2")
        );
        assert_eq!(page.previous, None);
    }

    #[rstest]
    fn links_preserve_repeated_filters() {
        let request = PageRequest::new(Some(2), Some(1)).expect("valid request");
        let page = Page::new(
            vec!["b"],
            3,
            request,
            &base("?tags=lunch&page=2&tags=dinner&limit=1"),
        );

        assert_eq!(
            page.next.as_deref(),
            Some("http://example.test/api/v1/recipes?tags=lunch&tags=dinner&limit=1&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://example.test/api/v1/recipes?tags=lunch&tags=dinner&limit=1")
        );
    }

    #[rstest]
    fn previous_link_from_page_three_names_page_two() {
        let request = PageRequest::new(Some(3), Some(1)).expect("valid request");
        let page = Page::new(vec!["c"], 3, request, &base("?page=3&limit=1"));

        assert_eq!(page.next, None);
        assert_eq!(
            page.previous.as_deref(),
            Some("http://example.test/api/v1/recipes?limit=1&page=2")
        );
    }

    #[rstest]
    fn map_keeps_metadata() {
        let request = PageRequest::new(None, Some(1)).expect("valid request");
        let page = Page::new(vec![1], 2, request, &base("")).map(|n| n * 10);

        assert_eq!(page.count, 2);
        assert_eq!(page.results, vec![10]);
        assert!(page.next.is_some());
    }

    #[rstest]
    fn serialises_to_envelope_shape() {
        let page = Page::new(Vec::<u8>::new(), 0, PageRequest::default(), &base(""));
        let value = serde_json::to_value(&page).expect("serialise page");

        assert_eq!(
            value,
            serde_json::json!({"count": 0, "next": null, "previous": null, "results": []})
        );
    }
}
