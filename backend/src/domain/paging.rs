//! Page of results returned by listing use-cases.

/// Items of one page together with the total across every page.
///
/// Inbound adapters combine this with the request URL to build the
/// `{count, next, previous, results}` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Items on the requested page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
}

impl<T> Paged<T> {
    /// A page with no items.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self::empty()
    }
}
