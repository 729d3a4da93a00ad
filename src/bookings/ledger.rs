use std::sync::Arc;

use chrono::NaiveDate;

use crate::bookings::models::{Booking, BookingStatus, NewBooking};
use crate::errors::ServiceError;
use crate::grounds::store::GroundRepo;
use crate::slots::store::TemplateRepo;
use crate::storage::StorageError;

pub trait BookingRepo: Send + Sync {
    /// Insert, failing with [`StorageError::Duplicate`] when an active
    /// booking already holds the same (ground, template, date) key. The
    /// backing store decides this atomically, two racing inserts can
    /// never both succeed.
    fn insert(&self, booking: NewBooking) -> Result<Booking, StorageError>;
    fn find(&self, id: i64) -> Result<Option<Booking>, StorageError>;
    fn set_status(&self, id: i64, status: BookingStatus) -> Result<Booking, StorageError>;
    fn delete(&self, id: i64) -> Result<(), StorageError>;
    fn list_by_ground(&self, ground_id: i64) -> Result<Vec<Booking>, StorageError>;
    fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, StorageError>;
    fn active_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StorageError>;
    fn count_active(&self) -> Result<i64, StorageError>;
}

/// The single path through which slots are taken and released.
#[derive(Clone)]
pub struct BookingLedger {
    bookings: Arc<dyn BookingRepo>,
    templates: Arc<dyn TemplateRepo>,
    grounds: Arc<dyn GroundRepo>,
}

impl BookingLedger {
    pub fn new(
        bookings: Arc<dyn BookingRepo>,
        templates: Arc<dyn TemplateRepo>,
        grounds: Arc<dyn GroundRepo>,
    ) -> BookingLedger {
        BookingLedger {
            bookings,
            templates,
            grounds,
        }
    }

    /// Take a slot occurrence for `user_id`. Losing a race for the last
    /// spot reports the same conflict as finding it already booked.
    #[tracing::instrument(skip(self))]
    pub fn reserve(
        &self,
        ground_id: i64,
        slot_template_id: i64,
        date: NaiveDate,
        user_id: i64,
    ) -> Result<Booking, ServiceError> {
        let ground = self.grounds.find(ground_id)?.ok_or(ServiceError::NotFound)?;

        if !ground.availability {
            conflict!("the ground is closed for bookings");
        }

        let template = self
            .templates
            .find(slot_template_id)?
            .ok_or(ServiceError::NotFound)?;

        if template.ground_id != ground_id {
            return Err(ServiceError::NotFound);
        }

        let booking = self
            .bookings
            .insert(NewBooking {
                ground_id,
                slot_template_id,
                date,
                user_id,
                status: BookingStatus::Confirmed,
            })
            .map_err(|error| match error {
                StorageError::Duplicate => ServiceError::Conflict(String::from("slot_taken")),
                other => other.into(),
            })?;

        info!(
            "user {} booked slot {} on ground {} for {}",
            user_id, slot_template_id, ground_id, date
        );

        Ok(booking)
    }

    /// Release a booking. Allowed for the booking holder and for the
    /// owner of the ground it sits on.
    pub fn cancel(&self, booking_id: i64, requester_id: i64) -> Result<Booking, ServiceError> {
        let booking = self
            .bookings
            .find(booking_id)?
            .ok_or(ServiceError::NotFound)?;

        let ground = self
            .grounds
            .find(booking.ground_id)?
            .ok_or(ServiceError::NotFound)?;

        if booking.user_id != requester_id && ground.owner_id != requester_id {
            forbidden!("only the booking holder or the ground owner can cancel a booking");
        }

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            conflict!("the booking is already cancelled");
        }

        Ok(self.bookings.set_status(booking_id, BookingStatus::Cancelled)?)
    }

    /// Physically remove a booking record. Owner only, cancellation is
    /// the path for everyone else.
    pub fn purge(&self, booking_id: i64, requester_id: i64) -> Result<(), ServiceError> {
        let booking = self
            .bookings
            .find(booking_id)?
            .ok_or(ServiceError::NotFound)?;

        let ground = self
            .grounds
            .find(booking.ground_id)?
            .ok_or(ServiceError::NotFound)?;

        if ground.owner_id != requester_id {
            forbidden!("only the ground owner can delete booking records");
        }

        Ok(self.bookings.delete(booking_id)?)
    }

    pub fn find(&self, booking_id: i64) -> Result<Booking, ServiceError> {
        Ok(self
            .bookings
            .find(booking_id)?
            .ok_or(ServiceError::NotFound)?)
    }

    pub fn list_by_ground(&self, ground_id: i64) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.bookings.list_by_ground(ground_id)?)
    }

    pub fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.bookings.list_by_user(user_id)?)
    }

    pub fn active_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.bookings.active_for_date(ground_id, date)?)
    }

    pub fn count_active(&self) -> Result<i64, ServiceError> {
        Ok(self.bookings.count_active()?)
    }
}
