use crate::entities::{DescriptionId, EntityKind};

/// Failures raised by [`NovelStore`](super::NovelStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} does not exist")]
    NotFound { kind: EntityKind, id: String },

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: &'static str },

    #[error("cannot delete {kind} {id}: still referenced by a {dependent}")]
    Protected {
        kind: EntityKind,
        id: String,
        dependent: EntityKind,
    },

    #[error("description {id} is {reason}")]
    CorruptDescription {
        id: DescriptionId,
        reason: &'static str,
    },

    #[error("failed to read or write store snapshot: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("failed to encode or decode store snapshot: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn protected(
        kind: EntityKind,
        id: impl std::fmt::Display,
        dependent: EntityKind,
    ) -> Self {
        StoreError::Protected {
            kind,
            id: id.to_string(),
            dependent,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
