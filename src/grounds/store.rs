use std::sync::Arc;

use crate::cache::{self, Cache};
use crate::errors::ServiceError;
use crate::grounds::models::{CreateGround, Ground, GroundFilter, UpdateGround};
use crate::storage::StorageError;
use crate::validator::Validate;

/// Persistence seam for grounds. The postgres store implements this in
/// production, the in-memory store stands in for it under test.
pub trait GroundRepo: Send + Sync {
    fn insert(&self, ground: CreateGround) -> Result<Ground, StorageError>;
    fn find(&self, id: i64) -> Result<Option<Ground>, StorageError>;
    fn list(&self, filter: GroundFilter) -> Result<Vec<Ground>, StorageError>;
    fn update(&self, id: i64, changes: UpdateGround) -> Result<Ground, StorageError>;
    fn delete(&self, id: i64) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct GroundStore {
    repo: Arc<dyn GroundRepo>,
}

impl GroundStore {
    pub fn new(repo: Arc<dyn GroundRepo>) -> GroundStore {
        GroundStore { repo }
    }

    pub fn create(&self, ground: CreateGround) -> Result<Ground, ServiceError> {
        ground.validate()?;

        let ground = self.repo.insert(ground)?;
        cache::set(&ground, ground.id);

        Ok(ground)
    }

    /// Read-through: cache hit skips the repository entirely.
    pub fn find(&self, id: i64) -> Result<Ground, ServiceError> {
        if let Some(ground) = cache::find::<Ground, i64>(id) {
            return Ok(ground);
        }

        let ground = self.repo.find(id)?.ok_or(ServiceError::NotFound)?;
        cache::set(&ground, ground.id);

        Ok(ground)
    }

    pub fn list(&self, filter: GroundFilter) -> Result<Vec<Ground>, ServiceError> {
        Ok(self.repo.list(filter)?)
    }

    pub fn update(&self, id: i64, changes: UpdateGround) -> Result<Ground, ServiceError> {
        changes.validate()?;

        // an empty changeset is a no-op read, not an error
        if changes.is_empty() {
            return self.find(id);
        }

        let ground = self.repo.update(id, changes)?;
        cache::set(&ground, ground.id);

        Ok(ground)
    }

    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.repo.delete(id)?;
        cache::delete(Ground::cache_key(id));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemStore;

    fn store() -> GroundStore {
        GroundStore::new(Arc::new(MemStore::default()))
    }

    fn ground(name: &str, owner_id: i64) -> CreateGround {
        CreateGround {
            name: String::from(name),
            location: String::from("12 Ring Road, Pune"),
            description: None,
            category: String::from("football_turf"),
            media: Vec::new(),
            availability: true,
            owner_id,
        }
    }

    #[test]
    fn created_grounds_can_be_found_again() {
        let store = store();

        let created = store.create(ground("City Arena", 7)).unwrap();
        let found = store.find(created.id).unwrap();

        assert_eq!(found.name, "City Arena");
        assert_eq!(found.owner_id, 7);
        assert!(found.availability);
    }

    #[test]
    fn find_reports_not_found_for_unknown_ids() {
        assert_eq!(store().find(999).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn invalid_grounds_are_rejected_before_any_write() {
        let store = store();

        let mut bad = ground("City Arena", 7);
        bad.category = String::from("Not A Slug");
        assert!(store.create(bad).is_err());

        assert!(store.list(GroundFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn list_filters_compose() {
        let store = store();
        store.create(ground("City Arena", 7)).unwrap();
        store.create(ground("River Nets", 7)).unwrap();
        let mut cricket = ground("Green Pitch", 8);
        cricket.category = String::from("cricket_net");
        store.create(cricket).unwrap();

        let all = store.list(GroundFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let by_owner = store
            .list(GroundFilter {
                owner_id: Some(7),
                ..GroundFilter::default()
            })
            .unwrap();
        assert_eq!(by_owner.len(), 2);

        let by_name = store
            .list(GroundFilter {
                name: Some(String::from("arena")),
                ..GroundFilter::default()
            })
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "City Arena");

        let by_category = store
            .list(GroundFilter {
                category: Some(String::from("cricket_net")),
                ..GroundFilter::default()
            })
            .unwrap();
        assert_eq!(by_category.len(), 1);
    }

    #[test]
    fn updates_change_only_the_given_fields() {
        let store = store();
        let created = store.create(ground("City Arena", 7)).unwrap();

        let updated = store
            .update(
                created.id,
                UpdateGround {
                    availability: Some(false),
                    ..UpdateGround::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "City Arena");
        assert!(!updated.availability);
    }

    #[test]
    fn empty_updates_read_back_the_ground() {
        let store = store();
        let created = store.create(ground("City Arena", 7)).unwrap();

        let unchanged = store.update(created.id, UpdateGround::default()).unwrap();
        assert_eq!(unchanged, created);
    }

    #[test]
    fn deleted_grounds_are_gone() {
        let store = store();
        let created = store.create(ground("City Arena", 7)).unwrap();

        store.delete(created.id).unwrap();
        assert_eq!(store.find(created.id).unwrap_err(), ServiceError::NotFound);
        assert_eq!(store.delete(created.id).unwrap_err(), ServiceError::NotFound);
    }
}
