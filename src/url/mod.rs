//! URL handling for Pagelens
//!
//! This module validates the caller-supplied root URL and implements the
//! internal/external classification rule used for discovered links.

use crate::PagelensError;
use url::Url;

/// Parses and validates an absolute HTTP(S) URL
///
/// This is the validation gate for `Visit`: the query URL must be
/// syntactically valid, absolute, and carry an http or https scheme.
///
/// # Arguments
///
/// * `raw` - The URL string supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Successfully parsed absolute URL
/// * `Err(PagelensError::InvalidUrl)` - Missing, relative, or unparsable URL
pub fn parse_absolute(raw: &str) -> Result<Url, PagelensError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(PagelensError::InvalidUrl {
            url: raw.to_string(),
            reason: "empty URL".to_string(),
        });
    }

    let parsed = Url::parse(raw).map_err(|e| PagelensError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PagelensError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    if parsed.host_str().is_none() {
        return Err(PagelensError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}

/// Extracts the host (with explicit port, if any) from a URL
///
/// Default ports are already normalized away by the parser, so
/// `http://example.com:80/` and `http://example.com/` compare equal.
pub fn host_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Classifies a link as internal to the session's root host
///
/// A link is internal when its host is empty or matches the root host,
/// port included. Host comparison is exact (no subdomain folding).
///
/// # Arguments
///
/// * `link` - The resolved absolute link URL
/// * `root_host` - The root page's host, captured at dispatch time
pub fn is_internal(link: &Url, root_host: &str) -> bool {
    match host_of(link) {
        None => true,
        Some(host) if host.is_empty() => true,
        Some(host) => host == root_host,
    }
}
