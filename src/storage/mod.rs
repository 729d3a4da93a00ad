use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// What a repository can tell its caller without leaking backend details.
/// `Duplicate` is the interesting one: it carries the outcome of the
/// storage-level compare-and-insert that arbitrates racing reservations.
#[derive(Debug, Display, PartialEq)]
pub enum StorageError {
    #[display(fmt = "duplicate record")]
    Duplicate,

    #[display(fmt = "record not found")]
    NotFound,

    #[display(fmt = "storage backend failure: {}", _0)]
    Backend(String),
}

impl From<DBError> for StorageError {
    fn from(error: DBError) -> StorageError {
        match error {
            DBError::NotFound => StorageError::NotFound,
            DBError::DatabaseError(kind, info) => {
                if let DatabaseErrorKind::UniqueViolation = kind {
                    return StorageError::Duplicate;
                }
                StorageError::Backend(info.details().unwrap_or_else(|| info.message()).to_string())
            }
            _ => StorageError::Backend(error.to_string()),
        }
    }
}

impl From<r2d2::Error> for StorageError {
    fn from(error: r2d2::Error) -> StorageError {
        StorageError::Backend(format!("connection pool error: {}", error))
    }
}
