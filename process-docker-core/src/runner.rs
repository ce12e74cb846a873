//! Typed wrappers over the docker subcommands the plugin needs.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::info::{parse_info_json, parse_info_json_for, Info};
use crate::ports::CommandExec;
use crate::run_args::RunArgs;
use crate::version::{parse_version_cli, Version};
use crate::version_info::VersionInfo;

/// Runs docker subcommands through a [`CommandExec`].
pub struct Runner<E> {
    exec: E,
    /// API version of the daemon, when known; picks the inspect schema.
    api_version: Option<VersionInfo>,
}

impl<E: CommandExec> Runner<E> {
    pub fn new(exec: E) -> Self {
        Self {
            exec,
            api_version: None,
        }
    }

    /// Decode inspect output with the schema of the given API version.
    pub fn with_api_version(mut self, api: VersionInfo) -> Self {
        self.api_version = Some(api);
        self
    }

    /// Start a detached container and return its ID.
    pub fn run(&self, args: &RunArgs) -> Result<String> {
        let argv = args.command_line_args();
        let out = self
            .exec
            .exec(&argv[0], &argv[1..])
            .with_context(|| format!("can't run container from image {:?}", args.image))?;

        let id = out.trim();
        if id.is_empty() {
            bail!("docker run printed no container id");
        }
        info!(container = id, image = %args.image, "container started");
        Ok(id.to_string())
    }

    /// Fetch the current state of a container. Never cached.
    pub fn inspect(&self, id: &str) -> Result<Info> {
        let context = || format!("can't inspect container {id:?}");
        let out = self
            .exec
            .exec("inspect", &[id.to_string()])
            .with_context(context)?;
        let info = match &self.api_version {
            Some(api) => parse_info_json_for(api, id, &out),
            None => parse_info_json(id, &out),
        }
        .with_context(context)?;
        debug!(container = id, state = %info.process.state, "inspected");
        Ok(info)
    }

    pub fn stop(&self, id: &str) -> Result<()> {
        self.exec
            .exec("stop", &[id.to_string()])
            .with_context(|| format!("error while stopping container {id:?}"))?;
        info!(container = id, "container stopped");
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        self.exec
            .exec("rm", &[id.to_string()])
            .with_context(|| format!("error while removing container {id:?}"))?;
        info!(container = id, "container removed");
        Ok(())
    }

    /// Ask the local client which docker and API versions it speaks.
    pub fn version(&self) -> Result<Version> {
        let out = self.exec.exec("version", &[])?;
        Ok(parse_version_cli(&out)?)
    }

    /// Import an image tarball with `docker load -i`.
    pub fn load(&self, path: &Path) -> Result<()> {
        let path = path.display().to_string();
        self.exec
            .exec("load", &["-i".to_string(), path.clone()])
            .with_context(|| format!("can't load image repository {path:?}"))?;
        info!(repo_file = %path, "image repository loaded");
        Ok(())
    }
}
