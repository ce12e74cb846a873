use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single port or an inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSpec {
    Single(u16),
    Range {
        #[serde(rename = "From")]
        from: u16,
        #[serde(rename = "To")]
        to: u16,
    },
}

impl PortSpec {
    /// Number of ports covered.
    pub fn width(self) -> u32 {
        match self {
            Self::Single(_) => 1,
            Self::Range { from, to } => u32::from(to.saturating_sub(from)) + 1,
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(port) => write!(f, "{port}"),
            Self::Range { from, to } => write!(f, "{from}-{to}"),
        }
    }
}

/// A host port (or range) published to a container port (or range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortAssignment {
    pub external: PortSpec,
    pub internal: PortSpec,
    pub protocol: String,
}

/// A host path mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountAssignment {
    pub external: String,
    pub internal: String,
    /// `ro`, `rw`, or empty for docker's default.
    pub mode: String,
}

/// Everything needed for one `docker run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    pub name: String,
    pub image: String,
    /// Tokens run inside the container, after the image.
    pub command: Vec<String>,
    /// Sorted by key so the generated argv is reproducible.
    pub env_vars: BTreeMap<String, String>,
    pub ports: Vec<PortAssignment>,
    pub mounts: Vec<MountAssignment>,
}

impl RunArgs {
    /// The argv (minus the `docker` binary) that starts this container detached.
    pub fn command_line_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--detach".to_string()];
        if !self.name.is_empty() {
            args.push("--name".to_string());
            args.push(self.name.clone());
        }

        for (key, value) in &self.env_vars {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }

        for port in &self.ports {
            args.push("-p".to_string());
            args.push(format!(
                "{}:{}/{}",
                port.external, port.internal, port.protocol
            ));
        }

        for mount in &self.mounts {
            args.push("-v".to_string());
            if mount.mode.is_empty() {
                args.push(format!("{}:{}", mount.external, mount.internal));
            } else {
                args.push(format!(
                    "{}:{}:{}",
                    mount.external, mount.internal, mount.mode
                ));
            }
        }

        // Docker treats everything after the image as the container command.
        args.push(self.image.clone());
        args.extend(self.command.iter().cloned());
        args
    }
}
