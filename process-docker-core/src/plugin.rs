//! The plugin facade: `launch`, `status`, and `destroy` as Juju sees them.
//!
//! The plugin never moves a container between states itself; every status it
//! reports is whatever `docker inspect` says right now.
//!
//! ```text
//! (none) ──launch──▶ Running | Unknown ──destroy──▶ (removed)
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::descriptor::ProcessDescriptor;
use crate::info::Info;
use crate::ports::CommandExec;
use crate::runner::Runner;

/// Information about a process launched by the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcDetails {
    /// Uniquely identifies the process to the plugin.
    pub id: String,
    /// Status of the process right after launch.
    pub status: ProcStatus,
}

/// The data returned by a status call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcStatus {
    /// Human-readable state label.
    pub state: String,
}

impl From<&Info> for ProcStatus {
    fn from(info: &Info) -> Self {
        Self {
            state: info.process.state.to_string(),
        }
    }
}

pub struct Plugin<E> {
    runner: Runner<E>,
}

impl<E: CommandExec> Plugin<E> {
    pub fn new(runner: Runner<E>) -> Self {
        Self { runner }
    }

    /// Run a new container for `descriptor` and report what docker made of it.
    pub fn launch(&self, descriptor: &ProcessDescriptor) -> Result<ProcDetails> {
        descriptor.validate()?;

        if let Some(repo_file) = descriptor.repo_file() {
            self.runner.load(Path::new(repo_file))?;
        }

        let id = self.runner.run(&descriptor.run_args())?;
        let info = self
            .runner
            .inspect(&id)
            .with_context(|| format!("can't get status for container {id:?}"))?;

        // Containers are addressed by name; fall back to the run ID without one.
        let name = info.name.trim_start_matches('/');
        let details = ProcDetails {
            id: if name.is_empty() { id } else { name.to_string() },
            status: ProcStatus::from(&info),
        };
        info!(id = %details.id, state = %details.status.state, "launched");
        Ok(details)
    }

    /// Current status of the container with the given ID or name.
    pub fn status(&self, id: &str) -> Result<ProcStatus> {
        let info = self.runner.inspect(id)?;
        Ok(ProcStatus::from(&info))
    }

    /// Stop and remove the container.
    ///
    /// If `stop` fails nothing is removed. If `rm` fails the container is
    /// left stopped.
    pub fn destroy(&self, id: &str) -> Result<()> {
        self.runner.stop(id)?;
        self.runner.remove(id)?;
        Ok(())
    }
}
