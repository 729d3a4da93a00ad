use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::ServiceError;
use crate::slots::models::{BlackoutInterval, NewBlackout};
use crate::storage::StorageError;
use crate::validator::Validate;

pub trait BlackoutRepo: Send + Sync {
    fn insert(&self, ground_id: i64, blackout: NewBlackout)
        -> Result<BlackoutInterval, StorageError>;
    fn find(&self, id: i64) -> Result<Option<BlackoutInterval>, StorageError>;
    fn list_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BlackoutInterval>, StorageError>;
    fn delete(&self, id: i64) -> Result<(), StorageError>;
}

/// Owner-placed maintenance windows. Blackouts are plain intervals over a
/// single date, overlapping or duplicate entries are stored as given.
#[derive(Clone)]
pub struct BlackoutRegistry {
    repo: Arc<dyn BlackoutRepo>,
}

impl BlackoutRegistry {
    pub fn new(repo: Arc<dyn BlackoutRepo>) -> BlackoutRegistry {
        BlackoutRegistry { repo }
    }

    pub fn block(
        &self,
        ground_id: i64,
        blackout: NewBlackout,
    ) -> Result<BlackoutInterval, ServiceError> {
        blackout.validate()?;

        Ok(self.repo.insert(ground_id, blackout)?)
    }

    pub fn list_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BlackoutInterval>, ServiceError> {
        Ok(self.repo.list_for_date(ground_id, date)?)
    }

    /// Remove a blackout, refusing ids that belong to another ground.
    pub fn unblock(&self, id: i64, ground_id: i64) -> Result<(), ServiceError> {
        let blackout = self.repo.find(id)?.ok_or(ServiceError::NotFound)?;

        if blackout.ground_id != ground_id {
            return Err(ServiceError::NotFound);
        }

        Ok(self.repo.delete(id)?)
    }
}
