//! URL normalization and validation.
//!
//! Turns caller-supplied text into a schemed, length-bounded absolute URL or
//! rejects it. The accepted string is returned as typed: hosts are not
//! lowercased, trailing slashes are not added and percent-encoding is untouched.

use std::net::Ipv4Addr;
use url::{Host, Url};

/// Maximum length of a stored URL, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Scheme prepended to input that has none.
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Errors that can occur during URL normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL exceeds maximum length of {max}")]
    TooLong { max: usize },

    #[error("Invalid URL format")]
    InvalidFormat,
}

/// Normalizes and validates a raw URL.
///
/// # Normalization Rules
///
/// 1. **Emptiness**: missing, empty or whitespace-only input is rejected
/// 2. **Whitespace**: leading and trailing whitespace is trimmed
/// 3. **Scheme**: `https://` is prepended unless the input starts with
///    `http://` or `https://` (case-sensitive)
/// 4. **Length**: the schemed URL must not exceed [`MAX_URL_LENGTH`] characters
/// 5. **Structure**: must pass [`is_valid`]
///
/// # Errors
///
/// Returns the [`UrlValidationError`] variant for the first rule that fails.
///
/// # Examples
///
/// ```
/// use shortlink::utils::url_normalizer::normalize_and_validate;
///
/// assert_eq!(
///     normalize_and_validate(Some("  www.google.com ")).unwrap(),
///     "https://www.google.com"
/// );
/// assert!(normalize_and_validate(Some("http://invalid_url")).is_err());
/// ```
pub fn normalize_and_validate(raw: Option<&str>) -> Result<String, UrlValidationError> {
    let trimmed = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(UrlValidationError::Empty),
    };

    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };

    if normalized.chars().count() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong {
            max: MAX_URL_LENGTH,
        });
    }

    if !is_valid(Some(&normalized)) {
        return Err(UrlValidationError::InvalidFormat);
    }

    Ok(normalized)
}

/// Checks that `url` is an absolute `http`/`https` URL with a valid authority.
///
/// Performs no trimming and no scheme inference. The rules follow common
/// strict URL validators rather than what a browser would tolerate:
///
/// - **Domain hosts**: labels of `[A-Za-z0-9-]` (1-63 chars, no edge hyphen),
///   at least two labels, ending in a public suffix known to the Public Suffix
///   List. `localhost`, `hello` and `example.invalidtld` are rejected.
/// - **IPv4 hosts**: exactly four dotted-decimal octets as typed; shorthand
///   forms such as `1.2.3` or `123` are rejected.
/// - **IPv6 hosts**: bracketed literals.
/// - **Userinfo**: unreserved, sub-delim and percent-encoded characters only.
/// - **Path**: no `//`, no `..` segment escaping the root, and only
///   `[A-Za-z0-9-_:@&?=+,.!/~*'%$;()]`.
pub fn is_valid(url: Option<&str>) -> bool {
    url.is_some_and(has_valid_structure)
}

fn has_valid_structure(input: &str) -> bool {
    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    // `Url::parse` tolerates `http:host`; an authority needs the `//` marker.
    let Some(rest) = input
        .get(url.scheme().len()..)
        .and_then(|rest| rest.strip_prefix("://"))
    else {
        return false;
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, after_authority) = rest.split_at(authority_end);
    let path_end = after_authority
        .find(['?', '#'])
        .unwrap_or(after_authority.len());

    let Some(raw_host) = split_authority(authority) else {
        return false;
    };

    let host_ok = match url.host() {
        Some(Host::Domain(domain)) => {
            is_valid_raw_domain(raw_host) && is_valid_hostname(domain)
        }
        Some(Host::Ipv4(_)) => raw_host.parse::<Ipv4Addr>().is_ok(),
        Some(Host::Ipv6(_)) => raw_host.starts_with('['),
        None => false,
    };

    host_ok && is_valid_path(&after_authority[..path_end])
}

/// Returns the host part of an authority as typed, after checking the userinfo
/// and port around it.
fn split_authority(authority: &str) -> Option<&str> {
    let host_port = match authority.rsplit_once('@') {
        Some((userinfo, host_port)) if is_valid_userinfo(userinfo) => host_port,
        Some(_) => return None,
        None => authority,
    };

    if host_port.starts_with('[') {
        let (host, port) = host_port.split_at(host_port.find(']')? + 1);
        let port_ok = port.is_empty() || port.strip_prefix(':').is_some_and(is_valid_port);
        return port_ok.then_some(host);
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => is_valid_port(port).then_some(host),
        None => Some(host_port),
    }
}

fn is_valid_port(port: &str) -> bool {
    port.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_userinfo(userinfo: &str) -> bool {
    userinfo.matches(':').count() <= 1
        && userinfo.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b":%-._~!$&'()*+,;=".contains(&b)
        })
}

/// Host characters before IDNA mapping; rejects percent-escapes and underscores
/// that `Url::parse` would otherwise decode or pass through.
fn is_valid_raw_domain(raw_host: &str) -> bool {
    !raw_host.is_empty()
        && raw_host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '.')
}

fn is_valid_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);

    if host.is_empty() || host.len() > 253 || !host.contains('.') {
        return false;
    }

    host.split('.').all(is_valid_label)
        && psl::suffix(host.as_bytes()).is_some_and(|suffix| suffix.is_known())
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn is_valid_path(path: &str) -> bool {
    if path.contains("//") {
        return false;
    }

    let mut depth: i32 = 0;
    for segment in path.split('/').skip(1) {
        match segment {
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            "." | "" => {}
            _ => depth += 1,
        }
    }

    path.bytes().all(|b| {
        b.is_ascii_alphanumeric() || b"-_:@&?=+,.!/~*'%$;()".contains(&b)
    })
}
