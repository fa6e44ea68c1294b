use std::path::PathBuf;
use thiserror::Error;

/// Settings could not be turned into a usable [`crate::config::LauncherConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings file {} is version v{found}; newest supported is v{supported}", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
    #[error("{catalog}: code '{code}' appears in both '{first}' and '{second}'")]
    DuplicateCode {
        catalog: &'static str,
        code: String,
        first: String,
        second: String,
    },
    #[error("settings i/o failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Process exit status for this failure; scripts tell "no config" from
    /// "bad config" by it.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::NotFound(_) => -1,
            _ => -2,
        }
    }
}

/// A broken inheritance chain. Fatal for the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("entry '{code}' names parent '{parent}', which is not in the catalog")]
    MissingParent { code: String, parent: String },
    #[error("parent chain loops back to '{code}': {}", .chain.join(" -> "))]
    ParentCycle { code: String, chain: Vec<String> },
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("input closed before a mod was chosen")]
    InputClosed,
    #[error("no executable with code '{0}'")]
    UnknownExecutable(String),
    #[error("no executable with a path is configured")]
    NoExecutable,
    #[error("no mod selected")]
    NoModSelected,
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error("failed to start {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
