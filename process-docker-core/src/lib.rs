//! Lets Juju manage Docker containers as workload processes.
//!
//! Layers, leaves first:
//!   - `version_info`  dotted version numbers
//!   - `version`       `docker version` output in its historical shapes
//!   - `info`          `docker inspect` JSON → `Info` / `State`
//!   - `descriptor`    the host's process descriptor and its validation
//!   - `run_args`      `docker run` argv construction
//!   - `ports`         the `CommandExec` trait boundary
//!   - `docker_cli`    the real `docker` adapter behind it
//!   - `runner`        typed `run`/`inspect`/`stop`/`rm`/`version`/`load`
//!   - `plugin`        `launch`/`status`/`destroy` as the host sees them

pub mod config;
pub mod descriptor;
pub mod docker_cli;
pub mod error;
pub mod info;
pub mod plugin;
pub mod ports;
pub mod run_args;
pub mod runner;
pub mod version;
pub mod version_info;

pub use descriptor::ProcessDescriptor;
pub use docker_cli::DockerCli;
pub use error::Error;
pub use info::{Info, Process, State};
pub use plugin::{Plugin, ProcDetails, ProcStatus};
pub use runner::Runner;
pub use version::{parse_version_cli, Version};
pub use version_info::{parse_version_info, VersionInfo};
