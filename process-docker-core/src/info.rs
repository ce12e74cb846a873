//! Normalized container state, decoded from `docker inspect` output.

use std::fmt;

use serde::Deserialize;

use crate::error::Error;
use crate::version_info::VersionInfo;

/// High-level state of a docker container.
///
/// Docker reports several independent flags; exactly one `State` is derived
/// from them, see [`State::from_flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Unknown,
    Running,
    Paused,
    Restarting,
    OOMKilled,
    Dead,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Restarting => "Restarting",
            Self::OOMKilled => "OOMKilled",
            Self::Dead => "Dead",
        }
    }

    /// First match wins: Running, OOMKilled, Dead, Restarting, Paused.
    pub fn from_flags(flags: &StateFlags) -> Self {
        if flags.running {
            Self::Running
        } else if flags.oom_killed {
            Self::OOMKilled
        } else if flags.dead {
            Self::Dead
        } else if flags.restarting {
            Self::Restarting
        } else if flags.paused {
            Self::Paused
        } else {
            Self::Unknown
        }
    }

    /// Map the `State.Status` string newer daemons report.
    fn from_status(status: &str) -> Self {
        match status {
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The boolean state flags of an inspect record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateFlags {
    pub running: bool,
    pub paused: bool,
    pub restarting: bool,
    pub oom_killed: bool,
    pub dead: bool,
}

/// The process running a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Process {
    pub state: State,
    pub pid: i64,
    /// Exit code of a stopped container.
    pub exit_code: i64,
    /// Error message from a failed container.
    pub error: String,
}

/// Everything we keep about a docker container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    /// The unique identifier docker assigned.
    pub id: String,
    /// The container name, as docker prints it (usually with a leading `/`).
    pub name: String,
    pub process: Process,
}

/// How an inspect record is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectSchema {
    /// Boolean flags only.
    Legacy,
    /// Boolean flags, falling back to `State.Status` when none is set.
    Current,
}

/// API versions at which the inspect schema changes, oldest first.
const SCHEMA_THRESHOLDS: &[((u64, u64, u64), InspectSchema)] =
    &[((1, 20, 0), InspectSchema::Current)];

impl InspectSchema {
    /// Pick the schema spoken by a daemon with the given API version.
    pub fn for_api(api: &VersionInfo) -> Self {
        SCHEMA_THRESHOLDS
            .iter()
            .rev()
            .find(|((major, minor, patch), _)| {
                *api >= VersionInfo::new(*major, *minor, *patch)
            })
            .map(|(_, schema)| *schema)
            .unwrap_or(InspectSchema::Legacy)
    }
}

/// Convert the JSON output of `docker inspect <id>` into an [`Info`].
pub fn parse_info_json(id: &str, data: &str) -> Result<Info, Error> {
    decode(id, data, InspectSchema::Current)
}

/// Like [`parse_info_json`], but decodes with the schema matching `api`.
pub fn parse_info_json_for(api: &VersionInfo, id: &str, data: &str) -> Result<Info, Error> {
    decode(id, data, InspectSchema::for_api(api))
}

fn decode(id: &str, data: &str, schema: InspectSchema) -> Result<Info, Error> {
    let mut records: Vec<RawInfo> = serde_json::from_str(data).map_err(|source| Error::Decode {
        id: id.to_string(),
        source,
    })?;

    match records.len() {
        0 => Err(Error::NoStatus { id: id.to_string() }),
        1 => Ok(records.remove(0).expose(schema)),
        _ => Err(Error::AmbiguousStatus { id: id.to_string() }),
    }
}

/// One record of `docker inspect` output; unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawInfo {
    id: String,
    name: String,
    state: RawState,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawState {
    running: bool,
    paused: bool,
    restarting: bool,
    #[serde(rename = "OOMKilled")]
    oom_killed: bool,
    dead: bool,
    pid: i64,
    exit_code: i64,
    error: String,
    status: Option<String>,
}

impl RawInfo {
    fn expose(self, schema: InspectSchema) -> Info {
        let state = self.state.value(schema);
        Info {
            id: self.id,
            name: self.name,
            process: Process {
                state,
                pid: self.state.pid,
                exit_code: self.state.exit_code,
                error: self.state.error,
            },
        }
    }
}

impl RawState {
    fn flags(&self) -> StateFlags {
        StateFlags {
            running: self.running,
            paused: self.paused,
            restarting: self.restarting,
            oom_killed: self.oom_killed,
            dead: self.dead,
        }
    }

    fn value(&self, schema: InspectSchema) -> State {
        let state = State::from_flags(&self.flags());
        match (schema, state, self.status.as_deref()) {
            (InspectSchema::Current, State::Unknown, Some(status)) => State::from_status(status),
            _ => state,
        }
    }
}
