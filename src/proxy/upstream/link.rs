// `Link` header parsing (RFC 8288 style, as emitted by GitLab)

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use url::Url;

static LINK_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([^>]*)>;\s*rel="(\w*)""#).expect("link entry pattern is valid")
});

/// Find the `rel="next"` target among all `Link` headers.
///
/// Relative targets resolve against `current`. Anything unparseable means
/// there is no next page.
pub fn next_page_url(headers: &HeaderMap, current: &Url) -> Option<Url> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| find_rel(value, "next"))
        .and_then(|target| current.join(target).ok())
}

fn find_rel<'a>(value: &'a str, rel: &str) -> Option<&'a str> {
    LINK_ENTRY
        .captures_iter(value)
        .find(|caps| &caps[2] == rel)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
