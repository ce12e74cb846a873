//! Parsing of `docker version` output.
//!
//! The CLI output has changed shape over docker releases:
//!
//! ```text
//! 1.0 – 1.7 (flat)                 1.8+ (nested)
//! ──────────────────────────────── ────────────────────────
//! Client version: 1.6.1            Client:
//! Client API version: 1.18          Version:      1.8.1
//! Go version (client): go1.2.1      API version:  1.20
//! Server version: 1.6.1            Server:
//! ...                               ...
//! ```
//!
//! Both shapes are accepted. Server details are never required.

use std::collections::HashMap;

use crate::error::Error;
use crate::version_info::{parse_version_info, VersionInfo};

/// Docker's version, as reported by the local client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Version {
    /// The docker client's version.
    pub client: VersionInfo,
    /// The version of the docker API spoken by the local client.
    pub api_client: VersionInfo,
}

/// Convert the CLI output of `docker version` into a [`Version`].
///
/// A missing API version line leaves `api_client` at the zero version.
pub fn parse_version_cli(out: &str) -> Result<Version, Error> {
    let (vers, api) = find_version_strings(out).ok_or(Error::VersionNotFound)?;

    let client = parse_version_info(&vers)?;
    let api_client = match api {
        Some(api) => parse_version_info(&api)?,
        None => VersionInfo::default(),
    };
    Ok(Version { client, api_client })
}

/// Returns the client version and, if present, the client API version.
fn find_version_strings(out: &str) -> Option<(String, Option<String>)> {
    // Pre-1.8 first.
    let flat = parse_flat(out);
    if let Some(vers) = flat.get("Client version") {
        return Some((vers.clone(), flat.get("Client API version").cloned()));
    }

    // Fall back to the 1.8 block format.
    let mut sections = parse_sections(out);
    let client = sections.remove("Client")?;
    let vers = client.get("Version")?.clone();
    Some((vers, client.get("API version").cloned()))
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Every `Key: value` line, regardless of indentation.
fn parse_flat(out: &str) -> HashMap<String, String> {
    out.lines()
        .filter_map(split_entry)
        .filter(|(_, value)| !value.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Any `Header:` line at column zero opens a section, whether or not text
/// follows the colon (`Client: Docker Engine - Community`). Indented
/// `Key: value` lines below it belong to it; the first value for a key wins,
/// so deeper sub-blocks cannot shadow the section's own entries.
fn parse_sections(out: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in out.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indented = line.starts_with(|c: char| c.is_whitespace());
        let Some((key, value)) = split_entry(line) else {
            continue;
        };

        if !indented {
            sections.entry(key.to_string()).or_default();
            current = Some(key.to_string());
            continue;
        }

        if let Some(name) = &current {
            sections
                .entry(name.clone())
                .or_default()
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    sections
}
