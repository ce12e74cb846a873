use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::error::Error;
use crate::ports::CommandExec;

/// Concrete adapter: runs the real `docker` binary.
pub struct DockerCli {
    bin: PathBuf,
}

impl DockerCli {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    fn describe(&self, subcommand: &str, args: &[String]) -> String {
        let mut command = format!("{} {subcommand}", self.bin.display());
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl CommandExec for DockerCli {
    fn exec(&self, subcommand: &str, args: &[String]) -> Result<String> {
        let command = self.describe(subcommand, args);
        debug!(%command, "exec");

        let out = Command::new(&self.bin)
            .arg(subcommand)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            warn!(%command, status = %out.status, %stderr, "docker command failed");
            return Err(Error::SubprocessFailure { command, stderr }.into());
        }

        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}
