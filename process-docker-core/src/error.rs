use thiserror::Error;

/// Failures produced while talking to docker or decoding what it printed.
///
/// Parsers return these directly. The runner and plugin facade wrap them in
/// `anyhow` context; use `downcast_ref::<Error>()` to get the variant back.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid proc-info: {reason}")]
    InvalidDescriptor { reason: String },

    #[error("failed to run: {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {stderr}")]
    SubprocessFailure { command: String, stderr: String },

    #[error("can't decode response from docker inspect {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no status returned from docker inspect {id}")]
    NoStatus { id: String },

    #[error("multiple status values returned from docker inspect {id}")]
    AmbiguousStatus { id: String },

    #[error("invalid version {raw:?}")]
    InvalidVersion { raw: String },

    #[error("could not determine version")]
    VersionNotFound,
}

impl Error {
    pub(crate) fn invalid_descriptor(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            reason: reason.into(),
        }
    }
}
