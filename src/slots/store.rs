use std::sync::Arc;

use crate::errors::ServiceError;
use crate::slots::models::{NewSlotTemplate, RecurrenceRule, SlotTemplate};
use crate::storage::StorageError;
use crate::validator::Validate;

pub trait TemplateRepo: Send + Sync {
    /// Insert the whole batch or nothing.
    fn insert_batch(
        &self,
        ground_id: i64,
        templates: Vec<NewSlotTemplate>,
    ) -> Result<Vec<SlotTemplate>, StorageError>;
    fn find(&self, id: i64) -> Result<Option<SlotTemplate>, StorageError>;
    fn list_by_ground(&self, ground_id: i64) -> Result<Vec<SlotTemplate>, StorageError>;
}

#[derive(Clone)]
pub struct SlotTemplateStore {
    repo: Arc<dyn TemplateRepo>,
}

impl SlotTemplateStore {
    pub fn new(repo: Arc<dyn TemplateRepo>) -> SlotTemplateStore {
        SlotTemplateStore { repo }
    }

    /// Validate every template up front so a bad entry rejects the whole
    /// batch before anything is written.
    pub fn add_templates(
        &self,
        ground_id: i64,
        templates: Vec<NewSlotTemplate>,
    ) -> Result<Vec<SlotTemplate>, ServiceError> {
        if templates.is_empty() {
            bad_request!("at least one slot is required");
        }

        for template in &templates {
            template.validate()?;
        }

        Ok(self.repo.insert_batch(ground_id, templates)?)
    }

    pub fn create_recurring(
        &self,
        ground_id: i64,
        mut template: NewSlotTemplate,
        rule: RecurrenceRule,
    ) -> Result<SlotTemplate, ServiceError> {
        template.recurring = true;
        template.rule = Some(rule);
        template.validate()?;

        let mut created = self.repo.insert_batch(ground_id, vec![template])?;
        created.pop().ok_or(ServiceError::InternalServerError)
    }

    pub fn find(&self, id: i64) -> Result<SlotTemplate, ServiceError> {
        Ok(self.repo.find(id)?.ok_or(ServiceError::NotFound)?)
    }

    pub fn list(&self, ground_id: i64) -> Result<Vec<SlotTemplate>, ServiceError> {
        Ok(self.repo.list_by_ground(ground_id)?)
    }
}
