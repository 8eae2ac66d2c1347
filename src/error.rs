use crate::types::WorkspaceId;
use std::fmt;
use thiserror::Error;

/// Store-layer error type.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A role record.
    Role,
    /// A permission record.
    Permission,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role => f.write_str("role"),
            Self::Permission => f.write_str("permission"),
        }
    }
}

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Backing-store failure wrapper; never produced by the in-memory store.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    /// Empty or malformed identifier input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Referenced entity does not exist in the given workspace.
    #[error("{kind} {id} not found in workspace {workspace}")]
    NotFound {
        workspace: WorkspaceId,
        kind: EntityKind,
        id: String,
    },
    /// The (workspace, id) pair is already taken.
    #[error("{kind} {id} already exists in workspace {workspace}")]
    AlreadyExists {
        workspace: WorkspaceId,
        kind: EntityKind,
        id: String,
    },
    /// A proposed parent edge would make an entity its own ancestor.
    #[error("cyclic inheritance for {kind} {id} in workspace {workspace}")]
    CyclicInheritance {
        workspace: WorkspaceId,
        kind: EntityKind,
        id: String,
    },
}

impl Error {
    pub(crate) fn not_found(
        workspace: &WorkspaceId,
        kind: EntityKind,
        id: impl fmt::Display,
    ) -> Self {
        Self::NotFound {
            workspace: workspace.clone(),
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(
        workspace: &WorkspaceId,
        kind: EntityKind,
        id: impl fmt::Display,
    ) -> Self {
        Self::AlreadyExists {
            workspace: workspace.clone(),
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn cyclic(
        workspace: &WorkspaceId,
        kind: EntityKind,
        id: impl fmt::Display,
    ) -> Self {
        Self::CyclicInheritance {
            workspace: workspace.clone(),
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}
