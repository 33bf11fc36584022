//! Share key validation.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, ShareError};

/// Anything the provider could accept: non-empty, no whitespace.
static KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+$").expect("Invalid key regex"));

/// Opaque identifier of a public share; the unit of cache keying.
///
/// Raw keys and public share links are both passed to the provider verbatim,
/// which decides whether they name a share.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareKey(String);

impl ShareKey {
    /// Trim a raw key or public share link, rejecting empty input and inner
    /// whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use disk_share::ShareKey;
    ///
    /// let key = ShareKey::parse("  https://disk.yandex.ru/d/AbC123  ").unwrap();
    /// assert_eq!(key.as_str(), "https://disk.yandex.ru/d/AbC123");
    ///
    /// assert!(ShareKey::parse("").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        if KEY_REGEX.is_match(trimmed) {
            return Ok(Self(trimmed.to_string()));
        }

        Err(ShareError::InvalidShareKey(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShareKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ShareKey {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
