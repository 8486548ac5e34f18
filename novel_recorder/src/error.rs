//! Error taxonomy of the recorder.

use novel_model::{DescriptionOwner, EntityKind, StoreError};

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn from_write(requires_write: bool) -> Self {
        if requires_write {
            Access::Write
        } else {
            Access::Read
        }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Read => f.write_str("view"),
            Access::Write => f.write_str("modify"),
        }
    }
}

/// How an error should be surfaced to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// No identity was supplied for an operation that needs one.
    Unauthenticated,
    /// The evaluator said no.
    AccessDenied,
    /// The request was malformed; resubmitting a corrected request can succeed.
    Validation,
    /// The request collides with a uniqueness or delete-protection rule.
    Conflict,
    NotFound,
    /// Stored data is in a state the application never produces.
    DataIntegrity,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("authentication is required for this operation")]
    LoginRequired,

    #[error("you have no permission to {access} this {kind}")]
    AccessDenied { kind: EntityKind, access: Access },

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{kind} {id} does not exist")]
    NotFound { kind: EntityKind, id: String },

    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: &'static str },

    #[error("cannot delete {kind} {id}: still referenced by a {dependent}")]
    Protected {
        kind: EntityKind,
        id: String,
        dependent: EntityKind,
    },

    #[error("{owner:?} has no primary description")]
    NoPrimaryDescription { owner: DescriptionOwner },

    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl RecorderError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        RecorderError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RecorderError::LoginRequired => ErrorClass::Unauthenticated,
            RecorderError::AccessDenied { .. } => ErrorClass::AccessDenied,
            RecorderError::Validation { .. } => ErrorClass::Validation,
            RecorderError::Conflict { .. } | RecorderError::Protected { .. } => {
                ErrorClass::Conflict
            }
            RecorderError::NotFound { .. } => ErrorClass::NotFound,
            RecorderError::NoPrimaryDescription { .. } | RecorderError::DataIntegrity(_) => {
                ErrorClass::DataIntegrity
            }
            RecorderError::Storage(_) => ErrorClass::Internal,
        }
    }

    /// Reinterpret a missing row as a broken reference. Used when following a
    /// stored foreign key, where absence means the store is inconsistent.
    pub(crate) fn dangling(self) -> Self {
        match self {
            RecorderError::NotFound { kind, id } => {
                RecorderError::DataIntegrity(format!("dangling reference to {kind} {id}"))
            }
            other => other,
        }
    }
}

impl From<StoreError> for RecorderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => RecorderError::NotFound { kind, id },
            StoreError::UniqueViolation { constraint } => RecorderError::Conflict { constraint },
            StoreError::Protected {
                kind,
                id,
                dependent,
            } => RecorderError::Protected {
                kind,
                id,
                dependent,
            },
            corrupt @ StoreError::CorruptDescription { .. } => {
                RecorderError::DataIntegrity(corrupt.to_string())
            }
            other => RecorderError::Storage(other),
        }
    }
}

pub type RecorderResult<T> = std::result::Result<T, RecorderError>;
