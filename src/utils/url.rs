// src/utils/url.rs

//! URL manipulation utilities.

/// Marker that precedes the original URL inside a web-archive URL.
const ARCHIVE_MARKER: &str = "/http";

/// Recover the original page URL embedded in a web-archive URL.
///
/// # Examples
/// ```
/// use serc_harvest::utils::url::original_url;
///
/// assert_eq!(
///     original_url("https://web.archive.org/web/2017/https://example.com/"),
///     Some("https://example.com/".to_string())
/// );
/// ```
pub fn original_url(archive_url: &str) -> Option<String> {
    let (_, tail) = archive_url.rsplit_once(ARCHIVE_MARKER)?;
    Some(format!("http{tail}"))
}

/// Extract the normalized domain of the page archived at `archive_url`.
///
/// The host is taken as written (internationalized names stay in Unicode),
/// lower-cased, a leading `www.` label is removed and the port is dropped.
/// Returns `None` when there is no embedded URL or it does not parse.
///
/// # Examples
/// ```
/// use serc_harvest::utils::url::extract_domain;
///
/// assert_eq!(
///     extract_domain("https://web.archive.org/web/20170101000000/http://www.Example.com:8080/path"),
///     Some("example.com".to_string())
/// );
/// assert_eq!(extract_domain("not-a-url"), None);
/// ```
pub fn extract_domain(archive_url: &str) -> Option<String> {
    let target = original_url(archive_url.trim())?;
    let parsed = url::Url::parse(&target).ok()?;
    let host = match raw_host(&target) {
        Some(raw) => raw.to_lowercase(),
        None => parsed.host_str()?.to_lowercase(),
    };
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Host text of `url` exactly as written, without userinfo or port.
///
/// The `url` crate converts internationalized hosts to punycode, so the
/// authority is cut out of the raw string instead.
fn raw_host(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '\\', '?', '#']).next()?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    let host = if host.starts_with('[') {
        // IPv6 literal
        host.find(']').map_or(host, |end| &host[..=end])
    } else {
        host.split(':').next().unwrap_or(host)
    };

    if host.is_empty() { None } else { Some(host) }
}
