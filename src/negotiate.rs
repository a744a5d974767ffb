//! Cache negotiation for conditional requests.

use crate::util::{parse_http_date, truncate_to_secs, HeaderSource};
use http::header;
use std::time::SystemTime;

/// The conditional request headers that can short-circuit serving an asset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conditionals {
    /// The parsed value of the `If-Modified-Since` request header.
    ///
    /// A header that is not a valid HTTP date is treated as absent.
    pub if_modified_since: Option<SystemTime>,
    /// The raw value of the `If-None-Match` request header.
    pub if_none_match: Option<String>,
}

impl Conditionals {
    /// Create an empty set of conditionals, which always proceeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect conditionals from request headers.
    pub fn from_headers<H: HeaderSource + ?Sized>(headers: &H) -> Self {
        let mut conditionals = Self::new();
        conditionals
            .if_modified_since_header(headers.header(header::IF_MODIFIED_SINCE.as_str()))
            .if_none_match_header(headers.header(header::IF_NONE_MATCH.as_str()));
        conditionals
    }

    /// Use the given `If-Modified-Since` request header value.
    pub fn if_modified_since_header(&mut self, value: Option<&str>) -> &mut Self {
        self.if_modified_since = value.and_then(parse_http_date);
        self
    }

    /// Use the given `If-None-Match` request header value.
    pub fn if_none_match_header(&mut self, value: Option<&str>) -> &mut Self {
        self.if_none_match = value.map(str::to_owned);
        self
    }
}

/// Outcome of cache negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Negotiation {
    /// The client copy is current, respond with 304.
    NotModified,
    /// Send the full content.
    Proceed,
}

/// Decide whether the client copy of an asset is still current.
///
/// `If-Modified-Since` is evaluated first, on whole seconds: a date at or after the
/// modification time is a match. Failing that, `If-None-Match` matches when it equals the
/// content hash, bare or quoted. Either one matching is enough.
pub fn decide(modified: SystemTime, content_hash: &str, conditionals: &Conditionals) -> Negotiation {
    if let Some(since) = conditionals.if_modified_since {
        if truncate_to_secs(since) >= truncate_to_secs(modified) {
            return Negotiation::NotModified;
        }
    }

    match conditionals.if_none_match {
        Some(ref value) if etag_matches(content_hash, value) => Negotiation::NotModified,
        _ => Negotiation::Proceed,
    }
}

fn etag_matches(content_hash: &str, value: &str) -> bool {
    let value = value.trim();
    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    unquoted == content_hash
}
