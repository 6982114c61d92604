use entx_api::params::{PARAM_PAGE, PARAM_PER_PAGE};
use url::Url;

/// Copy of `url` with the `page` and `per_page` query parameters removed.
/// Other parameters keep their order; an emptied query string is dropped.
pub fn url_without_page_params(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PARAM_PAGE && key != PARAM_PER_PAGE)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

/// Builds the navigation links of a paginated response.
///
/// Holds the request URL with its query string and fragment removed. Every
/// generated link is that URL with exactly the `page` and `per_page` query
/// parameters set.
///
/// # Example
/// ```
/// use entx_db::links::PageLinks;
/// use url::Url;
///
/// let request = Url::parse("http://10.0.0.5:8080/v1/items?page=2&q=x").unwrap();
/// let base = Url::parse("https://api.example.com/ignored?a=b").unwrap();
/// let links = PageLinks::new(&base, &request);
///
/// assert_eq!(links.path(), "https://api.example.com/v1/items");
/// assert_eq!(
///     links.page_url(3, 20),
///     "https://api.example.com/v1/items?page=3&per_page=20"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    base: Url,
}

impl PageLinks {
    /// Links on the inbound request's own scheme, host and path.
    pub fn from_request(request_url: &Url) -> Self {
        let mut base = request_url.clone();
        base.set_query(None);
        base.set_fragment(None);
        Self { base }
    }

    /// Links using the scheme, host and port of `base_url` and the path of
    /// `request_url`. Any credentials, path or query on `base_url` are
    /// discarded.
    pub fn new(base_url: &Url, request_url: &Url) -> Self {
        let mut base = base_url.clone();
        // Only fails for cannot-be-a-base URLs, which carry no credentials
        let _ = base.set_username("");
        let _ = base.set_password(None);
        base.set_path(request_url.path());
        base.set_query(None);
        base.set_fragment(None);
        Self { base }
    }

    /// Fully qualified request URL without query string.
    pub fn path(&self) -> String {
        self.base.to_string()
    }

    /// Link to `page` with `per_page` items per page.
    pub fn page_url(&self, page: u64, per_page: u64) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(PARAM_PAGE, &page.to_string())
            .append_pair(PARAM_PER_PAGE, &per_page.to_string());
        url.to_string()
    }
}
