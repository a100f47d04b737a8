//! Listing state for paginated, searchable views.

use docshare_org::{DisplayRange, Page, PageRequest, PageSize, Pagination};

/// Page, page size and search query of one listing.
///
/// Changing the query or the page size returns to the first page. The total
/// count comes from the last page fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pagination: Pagination,
    search: String,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ListState {
    /// Start on page 1 with no search.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            pagination: Pagination::new(1, page_size, 0),
            search: String::new(),
        }
    }

    /// The current search query.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Update the search query. Returns `true` if it changed, in which case
    /// the listing is back on page 1.
    pub fn set_search(&mut self, query: &str) -> bool {
        if self.search == query {
            return false;
        }
        self.search = query.to_string();
        self.pagination.go_to(1);
        true
    }

    /// The current position.
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.pagination.set_page_size(page_size);
    }

    /// Jump to a page, clamped into range.
    pub fn go_to(&mut self, page: u32) {
        self.pagination.go_to(page);
    }

    /// Next page, if any.
    pub fn next(&mut self) {
        self.pagination.next();
    }

    /// Previous page, if any.
    pub fn previous(&mut self) {
        self.pagination.previous();
    }

    /// Record the total count reported with a fetched page.
    pub fn apply_page<T>(&mut self, page: &Page<T>) {
        self.pagination.set_total_count(page.total_count);
    }

    /// The page to request next.
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.pagination.page(), self.pagination.page_size())
    }

    /// Rows currently shown, e.g. "Showing 11 to 20 of 42".
    pub fn range(&self) -> Option<DisplayRange> {
        self.pagination.range()
    }
}
