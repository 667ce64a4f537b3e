//! Compiled contract artifacts as produced by an external build step
//! (Hardhat or Foundry) and the registry used to look them up by name.

mod artifact;
mod artifacts;
pub mod networks;

pub use {
    artifact::ContractArtifact,
    artifacts::Artifacts,
};

use std::path::PathBuf;

/// Everything that can go wrong while resolving an artifact or preparing its
/// deployment code. None of these are recoverable at runtime: they point at a
/// build or configuration problem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no artifact found for contract {0:?}")]
    NotFound(String),

    #[error(
        "contract name {name:?} is ambiguous, use a fully qualified name: {}",
        .candidates.join(", ")
    )]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    #[error("contract {0:?} has no deployable bytecode (interface or abstract contract?)")]
    NotDeployable(String),

    #[error("contract {0:?} references libraries that were never linked")]
    UnlinkedLibrary(String),

    #[error("invalid artifact {location}: {reason}")]
    Invalid { location: String, reason: String },

    #[error("failed to read artifacts at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid constructor arguments for {contract:?}: {reason}")]
    ConstructorArgs { contract: String, reason: String },
}

impl Error {
    /// Whether the requested contract name is simply unknown, as opposed to
    /// known but unusable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
