//! Runtime configuration for the plugin.
//!
//! Resolution order: **env var > hardcoded default**. Empty values count as
//! unset.
//!
//! ```text
//! Field         Env Var                            Default
//! ───────────── ────────────────────────────────── ────────
//! docker_bin    JUJU_PROCESS_DOCKER_BIN            docker
//! log_filter    JUJU_PROCESS_DOCKER_LOG            warn
//! api_version   JUJU_PROCESS_DOCKER_API_VERSION    none (newest inspect schema)
//! ```

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::version_info::{parse_version_info, VersionInfo};

pub const ENV_DOCKER_BIN: &str = "JUJU_PROCESS_DOCKER_BIN";
pub const ENV_LOG: &str = "JUJU_PROCESS_DOCKER_LOG";
pub const ENV_API_VERSION: &str = "JUJU_PROCESS_DOCKER_API_VERSION";

const DEFAULT_DOCKER_BIN: &str = "docker";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The docker executable to invoke (`JUJU_PROCESS_DOCKER_BIN`).
    pub docker_bin: PathBuf,
    /// `tracing` filter directive for stderr logging (`JUJU_PROCESS_DOCKER_LOG`).
    pub log_filter: String,
    /// Daemon API version used to pick the inspect schema
    /// (`JUJU_PROCESS_DOCKER_API_VERSION`). `None` means the newest schema.
    pub api_version: Option<VersionInfo>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_with_env(|k| env::var(k).ok())
    }

    fn load_with_env(get_env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| get_env(key).filter(|v| !v.trim().is_empty());

        let mut cfg = Self::default();
        if let Some(bin) = get(ENV_DOCKER_BIN) {
            cfg.docker_bin = PathBuf::from(bin);
        }
        if let Some(filter) = get(ENV_LOG) {
            cfg.log_filter = filter;
        }
        if let Some(api) = get(ENV_API_VERSION) {
            let api = parse_version_info(api.trim())
                .with_context(|| format!("{ENV_API_VERSION} is not a version"))?;
            cfg.api_version = Some(api);
        }
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_bin: PathBuf::from(DEFAULT_DOCKER_BIN),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            api_version: None,
        }
    }
}
