//! Dotted version numbers (`major.minor.patch`) as printed by docker.

use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;

/// The details of a version.
///
/// Equality and ordering look only at the numeric components; `raw` is
/// carried along for display.
#[derive(Debug, Clone, Default)]
pub struct VersionInfo {
    /// The string the info was parsed from, if any.
    pub raw: String,
    pub major: u64,
    pub minor: u64,
    /// The patch (or "micro") version.
    pub patch: u64,
}

impl VersionInfo {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            raw: String::new(),
            major,
            minor,
            patch,
        }
    }

    /// Compare against `other`: -1 if `self` is older, 1 if newer, 0 if equal.
    pub fn compare(&self, other: &VersionInfo) -> i32 {
        match self.cmp(other) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    fn key(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

/// Parse the first `N[.M[.P]]` run found in `vers`.
///
/// Any non-digit prefix and any trailing text are ignored, so `"abc1.3xyz"`
/// parses as 1.3.0. Fails when the string holds no digit at all, or when a
/// component does not fit in a `u64`.
pub fn parse_version_info(vers: &str) -> Result<VersionInfo, Error> {
    let invalid = || Error::InvalidVersion {
        raw: vers.to_string(),
    };

    let start = vers.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let mut rest = &vers[start..];

    let mut parts = [0u64; 3];
    for (i, part) in parts.iter_mut().enumerate() {
        if i > 0 {
            // A component only counts when a dot is directly followed by digits.
            match rest.strip_prefix('.') {
                Some(after) if after.starts_with(|c: char| c.is_ascii_digit()) => rest = after,
                _ => break,
            }
        }
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        *part = rest[..len].parse().map_err(|_| invalid())?;
        rest = &rest[len..];
    }

    Ok(VersionInfo {
        raw: vers.to_string(),
        major: parts[0],
        minor: parts[1],
        patch: parts[2],
    })
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.raw.is_empty() {
            return f.write_str(&self.raw);
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl PartialEq for VersionInfo {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VersionInfo {}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
