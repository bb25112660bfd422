//! Minimal URL splitter for image source addresses.
//!
//! This is deliberately not a general URI parser: it performs a single
//! scan that recovers `{secure, host, path}` from absolute URLs of the
//! shape `http://host/path` or `https://host/path`. Query strings,
//! fragments, userinfo and IPv6 literals are out of scope, and no
//! normalisation (case folding, percent decoding, default ports) is
//! performed.

use crate::error::CastError;

/// Upper bound on the host component, matching the fixed host buffer
/// of the device firmware this protocol targets.
pub const DEFAULT_HOST_LIMIT: usize = 100;

/// Index range within which a colon is treated as the scheme separator.
/// A colon at or past this index is assumed to belong to the host
/// (typically a port number) and is left in place.
const SCHEME_COLON_LIMIT: usize = 7;

// ── ParsedUri ────────────────────────────────────────────────────

/// The three components a download attempt needs from a URL.
///
/// Constructed per attempt and discarded once the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri<'a> {
    /// `false` for `http` (colon at index 4), `true` for any longer
    /// scheme such as `https`.
    pub secure: bool,
    /// Host component, never empty, bounded by the caller's limit.
    pub host: String,
    /// Path component, always starting with `/`, borrowed from the
    /// source string.
    pub path: &'a str,
}

impl<'a> ParsedUri<'a> {
    /// Parse with the default host bound ([`DEFAULT_HOST_LIMIT`]).
    pub fn parse(raw: &'a str) -> Result<Self, CastError> {
        Self::parse_with_host_limit(raw, DEFAULT_HOST_LIMIT)
    }

    /// Single-scan parse of an absolute URL.
    ///
    /// The scheme is identified positionally: the first colon within
    /// the first [`SCHEME_COLON_LIMIT`] characters separates it from
    /// the authority. A colon at index 4 means `http` (insecure); a
    /// colon anywhere else in that window is taken as a longer, secure
    /// scheme. Schemes other than `http`/`https` are not rejected but
    /// classify by the same rule, so e.g. `ftp://` parses as secure.
    ///
    /// Fails with [`CastError::MalformedUri`] when the input is empty,
    /// no scheme colon is found, no `/` follows the host, the host is
    /// empty, or the host does not fit within `host_limit` bytes. On
    /// failure no partial host data escapes.
    pub fn parse_with_host_limit(raw: &'a str, host_limit: usize) -> Result<Self, CastError> {
        if raw.is_empty() {
            return Err(CastError::MalformedUri("empty URL"));
        }

        let bytes = raw.as_bytes();

        // Locate the scheme separator.
        let colon = bytes
            .iter()
            .take(SCHEME_COLON_LIMIT)
            .position(|&b| b == b':')
            .ok_or(CastError::MalformedUri("no scheme separator"))?;
        let secure = colon != 4;

        // Skip the two slashes after the colon; the host begins there.
        let host_start = colon + 3;
        if host_start >= raw.len() {
            return Err(CastError::MalformedUri("no host"));
        }

        // Host runs until the first `/`, which starts the path.
        let slash = bytes[host_start..]
            .iter()
            .position(|&b| b == b'/')
            .ok_or(CastError::MalformedUri("no path separator"))?;

        let host = &raw[host_start..host_start + slash];
        let path = &raw[host_start + slash..];

        if host.is_empty() {
            return Err(CastError::MalformedUri("empty host"));
        }
        if host.len() >= host_limit {
            return Err(CastError::MalformedUri("host exceeds buffer"));
        }

        Ok(Self {
            secure,
            host: host.to_string(),
            path,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────
