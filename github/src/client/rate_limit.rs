use crate::client::{HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET};
use reqwest::header::HeaderMap;

/// Rate limit snapshot reported alongside every API response.
///
/// Only recorded for logging; requests are never delayed or retried based
/// on it.
///
/// GitHub API docs: https://developer.github.com/v3/#rate-limiting
#[derive(Debug, Default, PartialEq)]
pub struct Rate {
    pub limit: Option<usize>,
    pub remaining: Option<usize>,
    /// UTC epoch seconds
    pub reset: Option<u64>,
}

impl Rate {
    pub(super) fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: parse_header(headers, HEADER_RATE_LIMIT),
            remaining: parse_header(headers, HEADER_RATE_REMAINING),
            reset: parse_header(headers, HEADER_RATE_RESET),
        }
    }
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse().ok())
}
