// src/checker/destination.rs
// =============================================================================
// Turns a Location header into an absolute URL and compares it with the
// expected target, one URL component at a time.
//
// The comparison is strict:
// - the query string is compared as raw text, so `?a=1&b=2` and `?b=2&a=1`
//   are different destinations
// - user-info and fragment count, even though browsers mostly ignore them
//
// Both sides go through the `url` crate first, so the usual WHATWG
// normalisation applies before comparing (lowercase scheme and host, default
// ports dropped, empty path of http(s) URLs becomes "/").
//
// Rust concepts:
// - Option<UrlComponent>: `None` means the URLs are the same
// - Url::join: Resolves relative references per RFC 3986
// =============================================================================

use reqwest::header::HeaderValue;
use std::fmt;
use url::Url;

use super::error::CheckError;

/// A single piece of a URL that the comparator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlComponent {
    Scheme,
    Username,
    Password,
    Host,
    Port,
    Path,
    Query,
    Fragment,
}

impl fmt::Display for UrlComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UrlComponent::Scheme => "scheme",
            UrlComponent::Username => "username",
            UrlComponent::Password => "password",
            UrlComponent::Host => "host",
            UrlComponent::Port => "port",
            UrlComponent::Path => "path",
            UrlComponent::Query => "query",
            UrlComponent::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// Returns the first component where `actual` and `expected` differ, or
/// `None` when they are the same destination.
pub fn first_difference(actual: &Url, expected: &Url) -> Option<UrlComponent> {
    if actual.scheme() != expected.scheme() {
        Some(UrlComponent::Scheme)
    } else if actual.username() != expected.username() {
        Some(UrlComponent::Username)
    } else if actual.password() != expected.password() {
        Some(UrlComponent::Password)
    } else if actual.host() != expected.host() {
        Some(UrlComponent::Host)
    } else if actual.port() != expected.port() {
        Some(UrlComponent::Port)
    } else if actual.path() != expected.path() {
        Some(UrlComponent::Path)
    } else if actual.query() != expected.query() {
        Some(UrlComponent::Query)
    } else if actual.fragment() != expected.fragment() {
        Some(UrlComponent::Fragment)
    } else {
        None
    }
}

/// Resolves a Location header against the URL that was requested.
///
/// Absolute values replace the request URL entirely; relative ones
/// (`/path`, `../x`, `//host/x`, `?q`) are joined onto it.
///
/// Servers often send non-ASCII paths as raw UTF-8 (`/café` instead of
/// `/caf%C3%A9`). Those are accepted: `Url::join` percent-encodes them the
/// same way `Url::parse` encodes the expected target.
pub fn resolve_location(request_url: &Url, location: &HeaderValue) -> Result<Url, CheckError> {
    let invalid = || CheckError::InvalidLocation {
        value: String::from_utf8_lossy(location.as_bytes()).into_owned(),
    };

    // HeaderValue::to_str() only accepts visible ASCII, so decode the bytes ourselves
    let raw = std::str::from_utf8(location.as_bytes()).map_err(|_| invalid())?;
    request_url.join(raw).map_err(|_| invalid())
}
