use url::Url;

/// Query parameter name for the page number.
pub const PARAM_PAGE: &str = "page";

/// Query parameter name for the number of items per page.
pub const PARAM_PER_PAGE: &str = "per_page";

pub const DEFAULT_PAGE: u64 = 1;

pub const DEFAULT_PER_PAGE: u64 = 10;

/// Raw pagination parameters as they arrive on the request.
///
/// Values are untrusted: missing, zero and negative numbers are all
/// accepted here and only replaced by defaults in [`PageParams::normalize`].
///
/// # Example
/// ```
/// use entx_api::params::PageParams;
///
/// let params = PageParams::from_query(Some("page=3&per_page=25&sort=name"));
/// assert_eq!(params.normalize(1, 10), (3, 25));
///
/// // A value that does not bind makes both fall back to defaults
/// let params = PageParams::from_query(Some("page=3&per_page=lots"));
/// assert_eq!(params.normalize(1, 10), (1, 10));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// Bind the parameters from a raw URL query string.
    ///
    /// Only the first occurrence of each parameter is considered.
    pub fn from_query(query: Option<&str>) -> Self {
        let Some(query) = query else {
            return Self::default();
        };

        let mut page = None;
        let mut per_page = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                PARAM_PAGE => &mut page,
                PARAM_PER_PAGE => &mut per_page,
                _ => continue,
            };
            if slot.is_some() {
                continue;
            }
            match value.trim().parse::<i64>() {
                Ok(parsed) => *slot = Some(parsed),
                Err(_) => return Self::default(),
            }
        }

        Self { page, per_page }
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query())
    }

    /// Resolve effective `(page, per_page)` values, substituting the given
    /// defaults for anything missing or below 1.
    pub fn normalize(&self, default_page: u64, default_per_page: u64) -> (u64, u64) {
        (
            positive_or(self.page, default_page),
            positive_or(self.per_page, default_per_page),
        )
    }
}

fn positive_or(value: Option<i64>, default: u64) -> u64 {
    match value {
        Some(v) if v >= 1 => v as u64,
        _ => default.max(1),
    }
}
