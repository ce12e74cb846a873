//! The host's process descriptor: what Juju asks us to launch.
//!
//! Decoded from the JSON passed to `launch`, e.g.
//!
//! ```json
//! {
//!     "Name": "unique-container-name",
//!     "Command": "command to run",
//!     "Image": "docker/whalesay",
//!     "Ports": [{"External": 7888, "Internal": 37888, "Endpoint": ""}],
//!     "Volumes": [{"ExternalMount": "/foo/bar", "InternalMount": "/baz/bat", "Mode": "ro"}],
//!     "EnvVars": {"foo": "bar"},
//!     "TypeOptions": {"RepoFile": "/home/foo/repository-to-load.tar"}
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::run_args::{MountAssignment, PortAssignment, PortSpec, RunArgs};

/// Type option naming an image tarball to `docker load` before launching.
pub const REPO_FILE_OPTION: &str = "RepoFile";

const DEFAULT_PROTOCOL: &str = "tcp";
const PROTOCOLS: &[&str] = &["tcp", "udp", "sctp"];
const MODES: &[&str] = &["", "ro", "rw"];

/// The command to run, either as one shell-like line or as tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Tokens(Vec<String>),
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self::Line(String::new())
    }
}

impl CommandSpec {
    /// Split into argv tokens. A line is split on whitespace.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            Self::Tokens(tokens) => tokens.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessPort {
    pub external: PortSpec,
    pub internal: PortSpec,
    #[serde(default)]
    pub endpoint: String,
    /// Defaults to tcp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ProcessVolume {
    pub external_mount: String,
    pub internal_mount: String,
    pub mode: String,
    pub name: String,
}

/// A workload process as described by the orchestration host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ProcessDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub type_options: BTreeMap<String, String>,
    pub command: CommandSpec,
    pub image: String,
    pub ports: Vec<ProcessPort>,
    pub volumes: Vec<ProcessVolume>,
    pub env_vars: BTreeMap<String, String>,
}

impl ProcessDescriptor {
    /// Decode a descriptor from the JSON the host passes on the command line.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Check the descriptor can be turned into a `docker run`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_descriptor("missing name"));
        }
        if self.image.trim().is_empty() {
            return Err(Error::invalid_descriptor(format!(
                "process {:?} is missing an image",
                self.name
            )));
        }

        for port in &self.ports {
            validate_port(port)?;
        }
        for volume in &self.volumes {
            validate_volume(volume)?;
        }
        for key in self.env_vars.keys() {
            if key.is_empty() || key.contains('=') {
                return Err(Error::invalid_descriptor(format!(
                    "invalid environment variable name {key:?}"
                )));
            }
        }
        Ok(())
    }

    /// The image tarball to load before launching, if one was given.
    pub fn repo_file(&self) -> Option<&str> {
        self.type_options
            .get(REPO_FILE_OPTION)
            .map(String::as_str)
            .filter(|path| !path.trim().is_empty())
    }

    /// Convert into arguments for `docker run`. Call [`validate`](Self::validate) first.
    pub fn run_args(&self) -> RunArgs {
        RunArgs {
            name: self.name.clone(),
            image: self.image.clone(),
            command: self.command.tokens(),
            env_vars: self.env_vars.clone(),
            ports: self
                .ports
                .iter()
                .map(|port| PortAssignment {
                    external: port.external,
                    internal: port.internal,
                    protocol: port
                        .protocol
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
                })
                .collect(),
            mounts: self
                .volumes
                .iter()
                .map(|vol| MountAssignment {
                    external: vol.external_mount.clone(),
                    internal: vol.internal_mount.clone(),
                    mode: vol.mode.clone(),
                })
                .collect(),
        }
    }
}

fn validate_port(port: &ProcessPort) -> Result<(), Error> {
    for spec in [port.external, port.internal] {
        let ok = match spec {
            PortSpec::Single(p) => p > 0,
            PortSpec::Range { from, to } => from > 0 && from <= to,
        };
        if !ok {
            return Err(Error::invalid_descriptor(format!("invalid port {spec}")));
        }
    }

    if port.external.width() != port.internal.width() {
        return Err(Error::invalid_descriptor(format!(
            "port range {} does not match {}",
            port.external, port.internal
        )));
    }

    if let Some(protocol) = &port.protocol {
        if !PROTOCOLS.contains(&protocol.as_str()) {
            return Err(Error::invalid_descriptor(format!(
                "unsupported port protocol {protocol:?}"
            )));
        }
    }
    Ok(())
}

fn validate_volume(volume: &ProcessVolume) -> Result<(), Error> {
    if volume.external_mount.is_empty() || volume.internal_mount.is_empty() {
        return Err(Error::invalid_descriptor(
            "volumes need both an external and an internal mount",
        ));
    }
    if !volume.internal_mount.starts_with('/') {
        return Err(Error::invalid_descriptor(format!(
            "internal mount {:?} must be an absolute path",
            volume.internal_mount
        )));
    }
    if !MODES.contains(&volume.mode.as_str()) {
        return Err(Error::invalid_descriptor(format!(
            "invalid volume mode {:?} (expected ro or rw)",
            volume.mode
        )));
    }
    Ok(())
}
