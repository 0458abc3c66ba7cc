//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listings are addressed by a one-based `page` query parameter and returned
//! inside a [`Page`] envelope carrying the total `count` plus relative links
//! to the neighbouring pages:
//!
//! ```json
//! {"count": 42, "next": "/api/v1/posts?page=3", "previous": "/api/v1/posts", "results": []}
//! ```
//!
//! The first page is always valid, even when the collection is empty. Any
//! other page past the end is rejected with [`PaginationError::PageOutOfRange`]
//! so adapters can surface it as "not found".

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size accepted by [`PageRequest::new`].
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Errors raised while validating pagination input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The page number could not be parsed or was zero.
    #[error("invalid page number: {value}")]
    InvalidPageNumber {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The page size lies outside `1..=MAX_PAGE_SIZE`.
    #[error("page size must be between 1 and {max}, got {size}")]
    InvalidPageSize {
        /// Requested page size.
        size: u32,
        /// Upper bound for page sizes.
        max: u32,
    },
    /// The page number points past the last page.
    #[error("page {page} is out of range; last page is {last}")]
    PageOutOfRange {
        /// Requested page number.
        page: u32,
        /// Last valid page number.
        last: u64,
    },
}

/// Validated page selection.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid page");
/// assert_eq!(request.offset(), 20);
/// assert_eq!(request.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Build a request for the one-based page `number` of `size` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPageNumber`] for page zero and
    /// [`PaginationError::InvalidPageSize`] for sizes outside the accepted
    /// range.
    pub fn new(number: u32, size: u32) -> Result<Self, PaginationError> {
        if number == 0 {
            return Err(PaginationError::InvalidPageNumber {
                value: number.to_string(),
            });
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PaginationError::InvalidPageSize {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { number, size })
    }

    /// Request the first page of `size` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPageSize`] for sizes outside the
    /// accepted range.
    pub fn first(size: u32) -> Result<Self, PaginationError> {
        Self::new(1, size)
    }

    /// Parse the raw `page` query value, defaulting to the first page.
    ///
    /// The literal `last` is not supported; callers must send a number.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPageNumber`] when the value is not a
    /// positive integer.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::parse(Some("2"), 5).expect("valid page");
    /// assert_eq!(request.number(), 2);
    /// assert!(PageRequest::parse(Some("zero"), 5).is_err());
    /// ```
    pub fn parse(raw: Option<&str>, size: u32) -> Result<Self, PaginationError> {
        let Some(raw) = raw else {
            return Self::first(size);
        };
        let number = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| PaginationError::InvalidPageNumber {
                value: raw.to_owned(),
            })?;
        Self::new(number, size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    /// Number of items to fetch for this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    /// Last valid page number for a collection of `count` items.
    #[must_use]
    pub fn last_page(&self, count: u64) -> u64 {
        count.div_ceil(u64::from(self.size)).max(1)
    }

    /// Check that this page exists for a collection of `count` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::PageOutOfRange`] when the page lies past the
    /// last page.
    pub fn ensure_within(&self, count: u64) -> Result<(), PaginationError> {
        let last = self.last_page(count);
        if u64::from(self.number) > last {
            return Err(PaginationError::PageOutOfRange {
                page: self.number,
                last,
            });
        }
        Ok(())
    }
}

/// Paginated listing envelope.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let request = PageRequest::new(2, 2).expect("valid page");
/// let page = Page::build(request, 5, vec!["c", "d"], "/api/v1/posts").expect("in range");
/// assert_eq!(page.next(), Some("/api/v1/posts?page=3"));
/// assert_eq!(page.previous(), Some("/api/v1/posts"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page of `results` for `request` within a collection of
    /// `count` items, linking neighbours relative to `base_path`.
    ///
    /// # Errors
    /// Returns [`PaginationError::PageOutOfRange`] when the page lies past the
    /// last page.
    pub fn build(
        request: PageRequest,
        count: u64,
        results: Vec<T>,
        base_path: &str,
    ) -> Result<Self, PaginationError> {
        request.ensure_within(count)?;
        let last = request.last_page(count);
        let number = u64::from(request.number());

        let next = (number < last).then(|| page_link(base_path, number + 1));
        let previous = (number > 1).then(|| page_link(base_path, number - 1));

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Link to the following page, if any.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Link to the preceding page, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Items on this page.
    #[must_use]
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_results(self) -> Vec<T> {
        self.results
    }

    /// Convert every item while keeping the envelope.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn page_link(base_path: &str, number: u64) -> String {
    if number == 1 {
        base_path.to_owned()
    } else {
        format!("{base_path}?{PAGE_PARAM}={number}")
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page arithmetic and link generation.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10)]
    #[case(1, 0)]
    #[case(1, MAX_PAGE_SIZE + 1)]
    fn rejects_invalid_requests(#[case] number: u32, #[case] size: u32) {
        assert!(PageRequest::new(number, size).is_err());
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some("1"), 1)]
    #[case(Some(" 4 "), 4)]
    fn parses_page_numbers(#[case] raw: Option<&str>, #[case] expected: u32) {
        let request = PageRequest::parse(raw, 10).expect("valid page");
        assert_eq!(request.number(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("last")]
    fn rejects_unparseable_page_numbers(#[case] raw: &str) {
        let err = PageRequest::parse(Some(raw), 10).expect_err("invalid page");
        assert!(matches!(err, PaginationError::InvalidPageNumber { .. }));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(100, 10)]
    fn last_page_rounds_up(#[case] count: u64, #[case] expected: u64) {
        let request = PageRequest::first(10).expect("valid size");
        assert_eq!(request.last_page(count), expected);
    }

    #[rstest]
    fn first_page_of_empty_collection_is_valid() {
        let request = PageRequest::first(10).expect("valid size");
        let page = Page::<u32>::build(request, 0, Vec::new(), "/items").expect("first page");
        assert_eq!(page.count(), 0);
        assert!(page.next().is_none());
        assert!(page.previous().is_none());
        assert!(page.results().is_empty());
    }

    #[rstest]
    fn page_past_the_end_is_rejected() {
        let request = PageRequest::new(3, 10).expect("valid page");
        let err = Page::<u32>::build(request, 20, Vec::new(), "/items").expect_err("out of range");
        assert_eq!(err, PaginationError::PageOutOfRange { page: 3, last: 2 });
    }

    #[rstest]
    fn middle_page_links_both_neighbours() {
        let request = PageRequest::new(3, 10).expect("valid page");
        let page = Page::build(request, 45, vec![1, 2], "/items").expect("in range");
        assert_eq!(page.next(), Some("/items?page=4"));
        assert_eq!(page.previous(), Some("/items?page=2"));
    }

    #[rstest]
    fn map_preserves_envelope() {
        let request = PageRequest::new(1, 2).expect("valid page");
        let page = Page::build(request, 3, vec![1, 2], "/items")
            .expect("in range")
            .map(|value| value * 10);
        assert_eq!(page.count(), 3);
        assert_eq!(page.next(), Some("/items?page=2"));
        assert_eq!(page.into_results(), vec![10, 20]);
    }

    #[rstest]
    fn serialises_envelope_fields() {
        let request = PageRequest::first(10).expect("valid size");
        let page = Page::build(request, 1, vec!["a"], "/items").expect("in range");
        let value = serde_json::to_value(&page).expect("serialise");
        assert_eq!(
            value,
            serde_json::json!({"count": 1, "next": null, "previous": null, "results": ["a"]})
        );
    }
}
