use axum::http::StatusCode;

use crate::domain::errors::ConstraintKind;
use crate::domain::errors::StorageError;

/// What a storage failure means to an API caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Duplicate,
    ValueTooLong,
    ForeignKey,
    BadRequest,
    Internal,
}

impl ErrorKind {
    /// Client-facing message. Internal failures never expose their cause.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::Duplicate => "duplicate value violates unique constraint",
            ErrorKind::ValueTooLong => "the value you are trying to insert is too large",
            ErrorKind::ForeignKey => "foreign key violation",
            ErrorKind::BadRequest => "invalid data supplied",
            ErrorKind::Internal => "internal server error",
        }
    }
}

/// A storage failure annotated with its kind and suggested response code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub source: &'a StorageError,
}

pub fn classify(err: &StorageError) -> Classification<'_> {
    let (kind, status) = match err {
        StorageError::Constraint { kind, .. } => {
            let kind = match kind {
                ConstraintKind::Duplicate => ErrorKind::Duplicate,
                ConstraintKind::ValueTooLong => ErrorKind::ValueTooLong,
                ConstraintKind::ForeignKey => ErrorKind::ForeignKey,
            };
            (kind, StatusCode::CONFLICT)
        }
        StorageError::InvalidData(_) => (ErrorKind::BadRequest, StatusCode::BAD_REQUEST),
        StorageError::Timeout(_) | StorageError::Unavailable(_) | StorageError::Database(_) => {
            (ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR)
        }
    };

    Classification {
        kind,
        status,
        source: err,
    }
}
