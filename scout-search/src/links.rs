//! Turning provider hrefs into URLs a content viewer can open.
//!
//! DuckDuckGo's HTML endpoint emits protocol-relative redirect wrappers like
//! `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`. Other
//! providers may emit paths relative to the results page.

use url::Url;

/// Resolve `href` (as found on the page served by `endpoint`) to an absolute URL.
///
/// - empty hrefs resolve to `None`
/// - protocol-relative hrefs get `https:`
/// - relative hrefs are joined against `endpoint`
/// - DuckDuckGo redirect wrappers are unwrapped to their `uddg` target
pub fn resolve(endpoint: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let parsed = if href.starts_with("//") {
        Url::parse(&format!("https:{href}")).ok()?
    } else {
        match Url::parse(href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(endpoint).ok()?.join(href).ok()?
            }
            Err(_) => return None,
        }
    };

    if let Some(target) = unwrap_redirect(&parsed) {
        return Some(target);
    }

    match parsed.scheme() {
        "http" | "https" => Some(parsed.into()),
        _ => None,
    }
}

/// Extract the real target from a DuckDuckGo `/l/?uddg=` redirect.
fn unwrap_redirect(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let is_ddg = host == "duckduckgo.com" || host.ends_with(".duckduckgo.com");
    if !is_ddg || !url.path().starts_with("/l/") {
        return None;
    }
    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
}
