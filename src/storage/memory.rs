use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};

use crate::bookings::ledger::BookingRepo;
use crate::bookings::models::{Booking, BookingStatus, NewBooking};
use crate::grounds::models::{CreateGround, Ground, GroundFilter, UpdateGround};
use crate::grounds::store::GroundRepo;
use crate::slots::blackouts::BlackoutRepo;
use crate::slots::models::{BlackoutInterval, NewBlackout, NewSlotTemplate, SlotTemplate};
use crate::slots::store::TemplateRepo;
use crate::storage::StorageError;

/// In-memory stand-in for the postgres store. A single mutex spans all
/// four tables, so the duplicate check and the insert inside
/// [`BookingRepo::insert`] happen as one atomic step, the same guarantee
/// the partial unique index gives the real store.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    grounds: BTreeMap<i64, Ground>,
    templates: BTreeMap<i64, SlotTemplate>,
    blackouts: BTreeMap<i64, BlackoutInterval>,
    bookings: BTreeMap<i64, Booking>,
}

impl Inner {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Fixture helpers. `MemStore` implements several traits that all have
    // an `insert`, these pick one without the call-site turbofish.
    pub fn insert_ground(&self, ground: CreateGround) -> Result<Ground, StorageError> {
        GroundRepo::insert(self, ground)
    }

    pub fn insert_templates(
        &self,
        ground_id: i64,
        templates: Vec<NewSlotTemplate>,
    ) -> Result<Vec<SlotTemplate>, StorageError> {
        TemplateRepo::insert_batch(self, ground_id, templates)
    }
}

impl GroundRepo for MemStore {
    fn insert(&self, ground: CreateGround) -> Result<Ground, StorageError> {
        let mut inner = self.lock();
        let id = inner.next();

        let ground = Ground {
            id,
            name: ground.name,
            location: ground.location,
            description: ground.description,
            category: ground.category,
            media: ground.media,
            availability: ground.availability,
            owner_id: ground.owner_id,
            created_at: Some(Utc::now()),
            updated_at: None,
        };

        inner.grounds.insert(id, ground.clone());
        Ok(ground)
    }

    fn find(&self, id: i64) -> Result<Option<Ground>, StorageError> {
        Ok(self.lock().grounds.get(&id).cloned())
    }

    fn list(&self, filter: GroundFilter) -> Result<Vec<Ground>, StorageError> {
        let inner = self.lock();

        let mut grounds: Vec<Ground> = inner
            .grounds
            .values()
            .filter(|ground| match &filter.name {
                Some(name) => ground.name.to_lowercase().contains(&name.to_lowercase()),
                None => true,
            })
            .filter(|ground| match &filter.category {
                Some(category) => &ground.category == category,
                None => true,
            })
            .filter(|ground| match filter.owner_id {
                Some(owner_id) => ground.owner_id == owner_id,
                None => true,
            })
            .cloned()
            .collect();

        grounds.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(grounds)
    }

    fn update(&self, id: i64, changes: UpdateGround) -> Result<Ground, StorageError> {
        let mut inner = self.lock();
        let ground = inner.grounds.get_mut(&id).ok_or(StorageError::NotFound)?;

        if let Some(name) = changes.name {
            ground.name = name;
        }
        if let Some(location) = changes.location {
            ground.location = location;
        }
        if let Some(description) = changes.description {
            ground.description = Some(description);
        }
        if let Some(category) = changes.category {
            ground.category = category;
        }
        if let Some(media) = changes.media {
            ground.media = media;
        }
        if let Some(availability) = changes.availability {
            ground.availability = availability;
        }
        ground.updated_at = Some(Utc::now());

        Ok(ground.clone())
    }

    fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.lock()
            .grounds
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

impl TemplateRepo for MemStore {
    fn insert_batch(
        &self,
        ground_id: i64,
        templates: Vec<NewSlotTemplate>,
    ) -> Result<Vec<SlotTemplate>, StorageError> {
        let mut inner = self.lock();

        let created: Vec<SlotTemplate> = templates
            .into_iter()
            .map(|template| {
                let id = inner.next();
                SlotTemplate {
                    id,
                    ground_id,
                    start_hour: template.start_hour,
                    end_hour: template.end_hour,
                    price: template.price,
                    duration: template.duration,
                    recurring: template.recurring,
                    start_date: template.start_date,
                    rule: template.rule,
                    created_at: Some(Utc::now()),
                }
            })
            .collect();

        for template in &created {
            inner.templates.insert(template.id, template.clone());
        }

        Ok(created)
    }

    fn find(&self, id: i64) -> Result<Option<SlotTemplate>, StorageError> {
        Ok(self.lock().templates.get(&id).cloned())
    }

    fn list_by_ground(&self, ground_id: i64) -> Result<Vec<SlotTemplate>, StorageError> {
        let inner = self.lock();

        let mut templates: Vec<SlotTemplate> = inner
            .templates
            .values()
            .filter(|template| template.ground_id == ground_id)
            .cloned()
            .collect();

        templates.sort_by_key(|template| (template.start_hour, template.id));
        Ok(templates)
    }
}

impl BlackoutRepo for MemStore {
    fn insert(
        &self,
        ground_id: i64,
        blackout: NewBlackout,
    ) -> Result<BlackoutInterval, StorageError> {
        let mut inner = self.lock();
        let id = inner.next();

        let blackout = BlackoutInterval {
            id,
            ground_id,
            date: blackout.date,
            start_hour: blackout.start_hour,
            end_hour: blackout.end_hour,
            reason: blackout.reason,
            created_at: Some(Utc::now()),
        };

        inner.blackouts.insert(id, blackout.clone());
        Ok(blackout)
    }

    fn find(&self, id: i64) -> Result<Option<BlackoutInterval>, StorageError> {
        Ok(self.lock().blackouts.get(&id).cloned())
    }

    fn list_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BlackoutInterval>, StorageError> {
        let inner = self.lock();

        let mut blackouts: Vec<BlackoutInterval> = inner
            .blackouts
            .values()
            .filter(|blackout| blackout.ground_id == ground_id && blackout.date == date)
            .cloned()
            .collect();

        blackouts.sort_by_key(|blackout| blackout.start_hour);
        Ok(blackouts)
    }

    fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.lock()
            .blackouts
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

impl BookingRepo for MemStore {
    fn insert(&self, booking: NewBooking) -> Result<Booking, StorageError> {
        let mut inner = self.lock();

        // only live rows take part in the uniqueness check
        if booking.status.is_active() {
            let taken = inner.bookings.values().any(|existing| {
                existing.ground_id == booking.ground_id
                    && existing.slot_template_id == booking.slot_template_id
                    && existing.date == booking.date
                    && existing.status.is_active()
            });

            if taken {
                return Err(StorageError::Duplicate);
            }
        }

        let id = inner.next();
        let booking = Booking {
            id,
            ground_id: booking.ground_id,
            slot_template_id: booking.slot_template_id,
            date: booking.date,
            user_id: booking.user_id,
            status: booking.status,
            created_at: Some(Utc::now()),
            updated_at: None,
        };

        inner.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    fn find(&self, id: i64) -> Result<Option<Booking>, StorageError> {
        Ok(self.lock().bookings.get(&id).cloned())
    }

    fn set_status(&self, id: i64, status: BookingStatus) -> Result<Booking, StorageError> {
        let mut inner = self.lock();
        let booking = inner.bookings.get_mut(&id).ok_or(StorageError::NotFound)?;

        booking.status = status;
        booking.updated_at = Some(Utc::now());

        Ok(booking.clone())
    }

    fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.lock()
            .bookings
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    fn list_by_ground(&self, ground_id: i64) -> Result<Vec<Booking>, StorageError> {
        let inner = self.lock();

        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|booking| booking.ground_id == ground_id)
            .cloned()
            .collect();

        bookings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(bookings)
    }

    fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, StorageError> {
        let inner = self.lock();

        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect();

        bookings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(bookings)
    }

    fn active_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StorageError> {
        let inner = self.lock();

        Ok(inner
            .bookings
            .values()
            .filter(|booking| {
                booking.ground_id == ground_id
                    && booking.date == date
                    && booking.status.is_active()
            })
            .cloned()
            .collect())
    }

    fn count_active(&self) -> Result<i64, StorageError> {
        let inner = self.lock();

        Ok(inner
            .bookings
            .values()
            .filter(|booking| booking.status.is_active())
            .count() as i64)
    }
}
