//! Pagination
//!
//! Member and invitation listings share one contract: a 1-based page, a page
//! size from a fixed set, and a total count reported by the system of record.
//! Everything else (total pages, the displayed range, clamped navigation) is
//! derived here.

use serde::{Deserialize, Serialize};

use crate::error::{OrgError, OrgResult};

/// Page sizes offered to users.
pub const PAGE_SIZES: [u32; 4] = [5, 10, 25, 50];

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A page size from [`PAGE_SIZES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Validate a page size.
    pub fn new(size: u32) -> OrgResult<Self> {
        if PAGE_SIZES.contains(&size) {
            Ok(Self(size))
        } else {
            Err(OrgError::InvalidPageSize(size))
        }
    }

    /// The size as a number.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = OrgError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

/// Inclusive 1-based range of rows shown on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRange {
    /// First row number
    pub start: u64,
    /// Last row number
    pub end: u64,
}

/// Position within a paginated listing.
///
/// The page is always kept within `1..=total_pages()`.
///
/// # Examples
///
/// ```
/// use docshare_org::{PageSize, Pagination};
///
/// let mut pagination = Pagination::new(1, PageSize::new(10).unwrap(), 42);
/// assert_eq!(pagination.total_pages(), 5);
///
/// pagination.go_to(9);
/// assert_eq!(pagination.page(), 5);
///
/// let range = pagination.range().unwrap();
/// assert_eq!((range.start, range.end), (41, 42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: PageSize,
    total_count: u64,
}

impl Pagination {
    /// Create a pagination state, clamping `page` into range.
    pub fn new(page: u32, page_size: PageSize, total_count: u64) -> Self {
        let mut pagination = Self {
            page: 1,
            page_size,
            total_count,
        };
        pagination.go_to(page);
        pagination
    }

    /// Current page (1-based).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current page size.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Total number of rows.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages; never less than one.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    /// Number of rows skipped before the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size.get())
    }

    /// Rows shown on the current page, or `None` when the listing is empty.
    pub fn range(&self) -> Option<DisplayRange> {
        if self.total_count == 0 {
            return None;
        }
        let start = self.offset() + 1;
        let end = (u64::from(self.page) * u64::from(self.page_size.get())).min(self.total_count);
        Some(DisplayRange { start, end })
    }

    /// Jump to `page`, clamped to `1..=total_pages()`.
    pub fn go_to(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// Move one page forward, staying on the last page.
    pub fn next(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    /// Move one page back, staying on the first page.
    pub fn previous(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Change the page size. Always returns to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Record a new total count, keeping the page in range.
    pub fn set_total_count(&mut self, total_count: u64) {
        self.total_count = total_count;
        self.go_to(self.page);
    }
}

/// `max(1, ceil(total_count / page_size))`.
pub fn total_pages(total_count: u64, page_size: PageSize) -> u32 {
    let size = u64::from(page_size.get());
    let pages = (total_count + size - 1) / size;
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

/// Requested page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,

    /// Rows per page
    #[serde(default)]
    pub page_size: PageSize,
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl PageRequest {
    /// Request `page` with `page_size` rows.
    pub fn new(page: u32, page_size: PageSize) -> Self {
        Self { page, page_size }
    }
}

/// One page of a listing as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,

    /// Rows across all pages
    pub total_count: u64,

    /// Number of pages
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice one page out of a complete, already-ordered listing.
    ///
    /// A page beyond the end is clamped to the last page.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total_count = all.len() as u64;
        let pagination = Pagination::new(request.page, request.page_size, total_count);
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let items = all
            .into_iter()
            .skip(offset)
            .take(request.page_size.get() as usize)
            .collect();

        Self {
            items,
            total_count,
            total_pages: pagination.total_pages(),
        }
    }

    /// Map the rows, keeping the counts.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u32) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn test_page_size_validation() {
        for n in PAGE_SIZES {
            assert!(PageSize::new(n).is_ok());
        }
        assert_eq!(PageSize::new(7), Err(OrgError::InvalidPageSize(7)));
        assert_eq!(PageSize::new(0), Err(OrgError::InvalidPageSize(0)));
        assert_eq!(PageSize::default().get(), 10);
    }

    #[test]
    fn test_total_pages_formula() {
        for page_size in PAGE_SIZES {
            for total in 0..=230u64 {
                let expected = ((total + page_size as u64 - 1) / page_size as u64).max(1) as u32;
                assert_eq!(total_pages(total, size(page_size)), expected);
            }
        }
    }

    #[test]
    fn test_range_never_exceeds_total() {
        for page_size in PAGE_SIZES {
            for total in 0..=120u64 {
                let pages = total_pages(total, size(page_size));
                for page in 1..=pages {
                    let p = Pagination::new(page, size(page_size), total);
                    match p.range() {
                        None => assert_eq!(total, 0),
                        Some(r) => {
                            assert!(r.start >= 1);
                            assert!(r.start <= r.end);
                            assert!(r.end <= total);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_listing() {
        let p = Pagination::new(3, size(10), 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.total_pages(), 1);
        assert!(p.range().is_none());
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn test_navigation_clamps() {
        let mut p = Pagination::new(1, size(5), 12);
        p.previous();
        assert_eq!(p.page(), 1);

        p.next();
        p.next();
        p.next();
        assert_eq!(p.page(), 3);

        p.go_to(0);
        assert_eq!(p.page(), 1);
        p.go_to(u32::MAX);
        assert_eq!(p.page(), 3);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut p = Pagination::new(3, size(5), 40);
        assert_eq!(p.page(), 3);

        p.set_page_size(size(25));
        assert_eq!(p.page(), 1);
        assert_eq!(p.total_pages(), 2);
    }

    #[test]
    fn test_shrinking_total_clamps_page() {
        let mut p = Pagination::new(4, size(10), 40);
        p.set_total_count(15);
        assert_eq!(p.page(), 2);
    }

    #[test]
    fn test_page_from_vec() {
        let rows: Vec<u32> = (1..=12).collect();
        let page = Page::from_vec(rows.clone(), PageRequest::new(3, size(5)));
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);

        let beyond = Page::from_vec(rows, PageRequest::new(9, size(5)));
        assert_eq!(beyond.items, vec![11, 12]);

        let empty = Page::<u32>::from_vec(Vec::new(), PageRequest::default());
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 1);
    }

    #[test]
    fn test_page_request_deserialize_defaults() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PageRequest::default());
        assert!(serde_json::from_str::<PageRequest>(r#"{"page_size": 7}"#).is_err());
    }
}
