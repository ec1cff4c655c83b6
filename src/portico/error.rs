use crate::model::ProjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PorticoError {
    #[error("Network is offline")]
    NetworkOffline,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Project not found: {0}")]
    NotFound(ProjectId),

    #[error("Invalid project data: {0}")]
    Validation(String),

    #[error("Featured set violation: {0}")]
    Invariant(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The first half of a featured swap landed but the second did not.
    /// Retrying the same replace converges.
    #[error(
        "Featured swap {outgoing} -> {incoming} only partially applied ({source}); retry to complete it"
    )]
    PartialReplace {
        outgoing: ProjectId,
        incoming: ProjectId,
        #[source]
        source: Box<PorticoError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl PorticoError {
    /// Errors that mean "the remote could not be reached", as opposed to the
    /// remote answering with a failure. Reads fall back to the mirror on these.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, PorticoError::NetworkOffline | PorticoError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, PorticoError>;
