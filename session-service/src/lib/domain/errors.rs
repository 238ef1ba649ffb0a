use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Integrity constraint families the store reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// SQLSTATE 23505
    Duplicate,
    /// SQLSTATE 22001
    ValueTooLong,
    /// SQLSTATE 23503
    ForeignKey,
}

impl ConstraintKind {
    pub fn sqlstate(&self) -> &'static str {
        match self {
            ConstraintKind::Duplicate => "23505",
            ConstraintKind::ValueTooLong => "22001",
            ConstraintKind::ForeignKey => "23503",
        }
    }

    fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(ConstraintKind::Duplicate),
            "22001" => Some(ConstraintKind::ValueTooLong),
            "23503" => Some(ConstraintKind::ForeignKey),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Duplicate => "duplicate value",
            ConstraintKind::ValueTooLong => "value too long",
            ConstraintKind::ForeignKey => "foreign key",
        };
        f.write_str(name)
    }
}

/// Failure reported by the backing store, already sorted by cause.
///
/// Repositories build this from the driver's structured error code.
/// Message matching is only used when no code is available.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Constraint violation ({kind}): {detail}")]
    Constraint {
        kind: ConstraintKind,
        constraint: Option<String>,
        detail: String,
    },

    /// Rejected data that came from the caller (SQLSTATE class 22/23).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Build an error from a SQLSTATE code and the driver message.
    pub fn from_sqlstate(code: &str, constraint: Option<&str>, detail: impl Into<String>) -> Self {
        let detail = detail.into();

        if let Some(kind) = ConstraintKind::from_sqlstate(code) {
            return StorageError::Constraint {
                kind,
                constraint: constraint.map(str::to_string),
                detail,
            };
        }

        if code.starts_with("22") || code.starts_with("23") {
            StorageError::InvalidData(detail)
        } else if code.starts_with("08") || code.starts_with("57") {
            StorageError::Unavailable(detail)
        } else {
            StorageError::Database(detail)
        }
    }

    /// Last-resort classification from an error message alone.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();

        let kind = [
            ConstraintKind::Duplicate,
            ConstraintKind::ValueTooLong,
            ConstraintKind::ForeignKey,
        ]
        .into_iter()
        .find(|kind| {
            message.contains(&format!("SQLSTATE {}", kind.sqlstate()))
                || lowered.contains(message_signature(*kind))
        });

        match kind {
            Some(kind) => StorageError::Constraint {
                kind,
                constraint: None,
                detail: message,
            },
            None => StorageError::Database(message),
        }
    }

    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            StorageError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether the failure was caused by the data the caller supplied.
    pub fn is_caller_input(&self) -> bool {
        matches!(
            self,
            StorageError::Constraint { .. } | StorageError::InvalidData(_)
        )
    }
}

fn message_signature(kind: ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::Duplicate => "violates unique constraint",
        ConstraintKind::ValueTooLong => "value too long",
        ConstraintKind::ForeignKey => "violates foreign key constraint",
    }
}
