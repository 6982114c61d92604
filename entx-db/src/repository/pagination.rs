use entx_api::params::{PageParams, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::links::PageLinks;

/// Page-number based pagination request
///
/// # Example
/// ```
/// use entx_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::new(1, 20); // First page with 20 items
/// let fallback = PageRequest::new(0, -1); // Normalized to page 1, 10 items
/// assert_eq!(fallback, PageRequest::new(1, 10));
/// assert_eq!(PageRequest::new(3, 20).offset(10), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based)
    pub page: u64,
    /// Number of items per page
    pub per_page: u64,
}

impl PageRequest {
    /// Create a page request from untrusted input, falling back to page `1`
    /// and `10` items per page for non-positive values.
    pub fn new(page: i64, per_page: i64) -> Self {
        Self::with_defaults(page, per_page, DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }

    /// Create a page request from untrusted input with the given defaults.
    pub fn with_defaults(page: i64, per_page: i64, default_page: u64, default_per_page: u64) -> Self {
        let (page, per_page) = PageParams::new(page, per_page).normalize(default_page, default_per_page);
        Self { page, per_page }
    }

    /// Create a page request from bound request parameters.
    pub fn from_params(params: &PageParams, config: &PaginationConfig) -> Self {
        let (page, per_page) = params.normalize(config.default_page, config.default_per_page);
        Self { page, per_page }
    }

    /// Effective page number, never below 1
    pub fn effective_page(&self) -> u64 {
        self.page.max(1)
    }

    /// Effective page size; `default` replaces a zero page size
    pub fn effective_per_page(&self, default: u64) -> u64 {
        if self.per_page < 1 {
            default.max(1)
        } else {
            self.per_page
        }
    }

    /// Number of rows skipped before the requested page
    pub fn offset(&self, default_per_page: u64) -> u64 {
        (self.effective_page() - 1).saturating_mul(self.effective_per_page(default_per_page))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paginated response containing one page of rows plus navigation metadata
///
/// Serializes to an object with all twelve fields present; link fields are
/// empty strings when the target page does not exist.
///
/// # Example
/// ```
/// use entx_db::repository::pagination::PageResult;
/// use entx_db::links::PageLinks;
/// use url::Url;
///
/// let links = PageLinks::from_request(&Url::parse("http://localhost/items").unwrap());
/// let page: PageResult<u32> = PageResult::empty(10, &links);
///
/// assert_eq!(page.current_page, 1);
/// assert_eq!(page.first_page_url, "http://localhost/items?page=1&per_page=10");
/// assert!(page.next_page_url.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Total number of rows across all pages
    pub total: u64,
    /// Number of rows per page
    pub per_page: u64,
    /// Requested page number
    pub current_page: u64,
    /// Last page number
    pub last_page: u64,
    /// URL of the first page
    pub first_page_url: String,
    /// URL of the last page, empty when there is only one page
    pub last_page_url: String,
    /// URL of the next page, empty on the last page
    pub next_page_url: String,
    /// URL of the previous page, empty on the first page
    pub prev_page_url: String,
    /// Fully qualified URL without query string
    pub path: String,
    /// 1-based index of the first row in `data`
    pub from: u64,
    /// 1-based index of the last row in `data`
    pub to: u64,
    /// Rows of the current page
    pub data: Vec<T>,
}

impl<T> PageResult<T> {
    /// Result for a query without any rows
    pub fn empty(per_page: u64, links: &PageLinks) -> Self {
        Self {
            total: 0,
            per_page,
            current_page: 1,
            last_page: 1,
            first_page_url: links.page_url(1, per_page),
            last_page_url: String::new(),
            next_page_url: String::new(),
            prev_page_url: String::new(),
            path: links.path(),
            from: 0,
            to: 0,
            data: Vec::new(),
        }
    }

    /// Transform every row, keeping all metadata. The mapper receives the
    /// 0-based index of the row within the page.
    pub fn map_data<U, F>(self, mut mapper: F) -> PageResult<U>
    where
        F: FnMut(T, usize) -> U,
    {
        let data = self
            .data
            .into_iter()
            .enumerate()
            .map(|(index, row)| mapper(row, index))
            .collect();

        PageResult {
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page: self.last_page,
            first_page_url: self.first_page_url,
            last_page_url: self.last_page_url,
            next_page_url: self.next_page_url,
            prev_page_url: self.prev_page_url,
            path: self.path,
            from: self.from,
            to: self.to,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn links() -> PageLinks {
        PageLinks::from_request(&Url::parse("https://example.com/items?page=4").unwrap())
    }

    #[test]
    fn test_page_request_normalization() {
        assert_eq!(PageRequest::new(3, 25), PageRequest { page: 3, per_page: 25 });
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, per_page: 10 });
        assert_eq!(PageRequest::new(-4, -1), PageRequest::default());
        assert_eq!(
            PageRequest::with_defaults(0, 0, 2, 50),
            PageRequest { page: 2, per_page: 50 }
        );
    }

    #[test]
    fn test_page_request_effective_values() {
        let raw = PageRequest { page: 0, per_page: 0 };
        assert_eq!(raw.effective_page(), 1);
        assert_eq!(raw.effective_per_page(10), 10);
        assert_eq!(raw.effective_per_page(0), 1);
        assert_eq!(raw.offset(10), 0);

        let huge = PageRequest { page: u64::MAX, per_page: 100 };
        assert_eq!(huge.offset(10), u64::MAX);
    }

    #[test]
    fn test_from_params() {
        let params = PageParams::from_query(Some("page=5"));
        let config = PaginationConfig::new(1, 30);
        assert_eq!(PageRequest::from_params(&params, &config), PageRequest { page: 5, per_page: 30 });
    }

    #[test]
    fn test_empty_result_serialization() {
        let page: PageResult<String> = PageResult::empty(10, &links());
        let json = serde_json::to_value(&page).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 12);
        assert_eq!(json["total"], 0);
        assert_eq!(json["current_page"], 1);
        assert_eq!(json["last_page"], 1);
        assert_eq!(json["first_page_url"], "https://example.com/items?page=1&per_page=10");
        assert_eq!(json["last_page_url"], "");
        assert_eq!(json["next_page_url"], "");
        assert_eq!(json["prev_page_url"], "");
        assert_eq!(json["path"], "https://example.com/items");
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[test]
    fn test_map_data_keeps_metadata() {
        let mut page = PageResult::empty(3, &links());
        page.total = 7;
        page.current_page = 3;
        page.last_page = 3;
        page.from = 7;
        page.to = 7;
        page.data = vec!["g"];

        let mapped = page.clone().map_data(|row, index| format!("{index}:{row}"));
        assert_eq!(mapped.data, vec!["0:g".to_string()]);
        assert_eq!(mapped.total, page.total);
        assert_eq!(mapped.from, page.from);
        assert_eq!(mapped.to, page.to);
        assert_eq!(mapped.first_page_url, page.first_page_url);
        assert_eq!(mapped.path, page.path);
    }
}
