use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::bookings::ledger::BookingRepo;
use crate::bookings::models::{Booking, BookingStatus, NewBooking};
use crate::db;
use crate::grounds::models::{CreateGround, Ground, GroundFilter, UpdateGround};
use crate::grounds::store::GroundRepo;
use crate::schema::{blackouts, bookings, grounds, slot_templates};
use crate::slots::blackouts::BlackoutRepo;
use crate::slots::models::{
    BlackoutInterval, NewBlackout, NewSlotTemplate, RecurrenceRule, SlotTemplate,
};
use crate::slots::store::TemplateRepo;
use crate::storage::StorageError;

/// The production repository: every trait in front of the same pool.
///
/// Reservation races are not arbitrated here but by the partial unique
/// index on bookings, which only sees rows whose status is not
/// "cancelled". The insert that loses surfaces as a unique violation and
/// becomes [`StorageError::Duplicate`].
pub struct PgStore {
    pool: db::Pool,
}

impl PgStore {
    pub fn new(pool: db::Pool) -> PgStore {
        PgStore { pool }
    }

    fn conn(&self) -> Result<db::Conn, StorageError> {
        Ok(self.pool.get()?)
    }
}

#[derive(Queryable)]
struct GroundRow {
    id: i64,
    name: String,
    location: String,
    description: Option<String>,
    category: String,
    media: Vec<String>,
    availability: bool,
    owner_id: i64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<GroundRow> for Ground {
    fn from(row: GroundRow) -> Ground {
        Ground {
            id: row.id,
            name: row.name,
            location: row.location,
            description: row.description,
            category: row.category,
            media: row.media,
            availability: row.availability,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Insertable)]
#[table_name = "grounds"]
struct NewGroundRow {
    name: String,
    location: String,
    description: Option<String>,
    category: String,
    media: Vec<String>,
    availability: bool,
    owner_id: i64,
}

impl From<CreateGround> for NewGroundRow {
    fn from(ground: CreateGround) -> NewGroundRow {
        NewGroundRow {
            name: ground.name,
            location: ground.location,
            description: ground.description,
            category: ground.category,
            media: ground.media,
            availability: ground.availability,
            owner_id: ground.owner_id,
        }
    }
}

#[derive(AsChangeset)]
#[table_name = "grounds"]
struct GroundChangeset {
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
    category: Option<String>,
    media: Option<Vec<String>>,
    availability: Option<bool>,
}

impl From<UpdateGround> for GroundChangeset {
    fn from(changes: UpdateGround) -> GroundChangeset {
        GroundChangeset {
            name: changes.name,
            location: changes.location,
            description: changes.description,
            category: changes.category,
            media: changes.media,
            availability: changes.availability,
        }
    }
}

impl GroundRepo for PgStore {
    fn insert(&self, ground: CreateGround) -> Result<Ground, StorageError> {
        let conn = self.conn()?;

        let row: GroundRow = diesel::insert_into(grounds::table)
            .values(NewGroundRow::from(ground))
            .get_result(&conn)?;

        Ok(row.into())
    }

    fn find(&self, id: i64) -> Result<Option<Ground>, StorageError> {
        let conn = self.conn()?;

        let row = grounds::table
            .find(id)
            .first::<GroundRow>(&conn)
            .optional()?;

        Ok(row.map(Ground::from))
    }

    fn list(&self, filter: GroundFilter) -> Result<Vec<Ground>, StorageError> {
        let conn = self.conn()?;

        let mut query = grounds::table.order(grounds::name.asc()).into_boxed();

        if let Some(name) = filter.name {
            query = query.filter(grounds::name.ilike(format!("%{}%", name)));
        }

        if let Some(category) = filter.category {
            query = query.filter(grounds::category.eq(category));
        }

        if let Some(owner_id) = filter.owner_id {
            query = query.filter(grounds::owner_id.eq(owner_id));
        }

        let rows = query.load::<GroundRow>(&conn)?;

        Ok(rows.into_iter().map(Ground::from).collect())
    }

    fn update(&self, id: i64, changes: UpdateGround) -> Result<Ground, StorageError> {
        let conn = self.conn()?;

        let row: GroundRow = diesel::update(grounds::table.find(id))
            .set(GroundChangeset::from(changes))
            .get_result(&conn)?;

        Ok(row.into())
    }

    fn delete(&self, id: i64) -> Result<(), StorageError> {
        let conn = self.conn()?;

        let deleted = diesel::delete(grounds::table.find(id)).execute(&conn)?;

        if deleted == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[derive(Queryable)]
struct TemplateRow {
    id: i64,
    ground_id: i64,
    start_hour: i16,
    end_hour: i16,
    price: i64,
    duration: i16,
    recurring: bool,
    start_date: NaiveDate,
    frequency: Option<String>,
    recur_interval: Option<i32>,
    recur_until: Option<NaiveDate>,
    created_at: Option<DateTime<Utc>>,
}

impl TemplateRow {
    /// Recompose the flattened recurrence columns into a rule. A
    /// frequency we cannot parse means the row was written by something
    /// newer than us, better to fail loudly than to silently drop it.
    fn domain(self) -> Result<SlotTemplate, StorageError> {
        let rule = match self.frequency {
            None => None,
            Some(frequency) => {
                let frequency = frequency
                    .parse()
                    .map_err(|error: String| StorageError::Backend(error))?;

                Some(RecurrenceRule {
                    frequency,
                    interval: self.recur_interval.unwrap_or(1),
                    until: self.recur_until,
                })
            }
        };

        Ok(SlotTemplate {
            id: self.id,
            ground_id: self.ground_id,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            price: self.price,
            duration: self.duration,
            recurring: self.recurring,
            start_date: self.start_date,
            rule,
            created_at: self.created_at,
        })
    }
}

#[derive(Insertable)]
#[table_name = "slot_templates"]
struct NewTemplateRow {
    ground_id: i64,
    start_hour: i16,
    end_hour: i16,
    price: i64,
    duration: i16,
    recurring: bool,
    start_date: NaiveDate,
    frequency: Option<String>,
    recur_interval: Option<i32>,
    recur_until: Option<NaiveDate>,
}

impl NewTemplateRow {
    fn from_template(ground_id: i64, template: NewSlotTemplate) -> NewTemplateRow {
        let (frequency, recur_interval, recur_until) = match template.rule {
            Some(rule) => (
                Some(rule.frequency.to_string()),
                Some(rule.interval),
                rule.until,
            ),
            None => (None, None, None),
        };

        NewTemplateRow {
            ground_id,
            start_hour: template.start_hour,
            end_hour: template.end_hour,
            price: template.price,
            duration: template.duration,
            recurring: template.recurring,
            start_date: template.start_date,
            frequency,
            recur_interval,
            recur_until,
        }
    }
}

impl TemplateRepo for PgStore {
    fn insert_batch(
        &self,
        ground_id: i64,
        templates: Vec<NewSlotTemplate>,
    ) -> Result<Vec<SlotTemplate>, StorageError> {
        let conn = self.conn()?;

        let rows: Vec<NewTemplateRow> = templates
            .into_iter()
            .map(|template| NewTemplateRow::from_template(ground_id, template))
            .collect();

        // a single multi-row insert, the batch lands or fails as one
        let created = diesel::insert_into(slot_templates::table)
            .values(&rows)
            .get_results::<TemplateRow>(&conn)?;

        created.into_iter().map(TemplateRow::domain).collect()
    }

    fn find(&self, id: i64) -> Result<Option<SlotTemplate>, StorageError> {
        let conn = self.conn()?;

        let row = slot_templates::table
            .find(id)
            .first::<TemplateRow>(&conn)
            .optional()?;

        row.map(TemplateRow::domain).transpose()
    }

    fn list_by_ground(&self, ground_id: i64) -> Result<Vec<SlotTemplate>, StorageError> {
        let conn = self.conn()?;

        let rows = slot_templates::table
            .filter(slot_templates::ground_id.eq(ground_id))
            .order((slot_templates::start_hour.asc(), slot_templates::id.asc()))
            .load::<TemplateRow>(&conn)?;

        rows.into_iter().map(TemplateRow::domain).collect()
    }
}

#[derive(Queryable)]
struct BlackoutRow {
    id: i64,
    ground_id: i64,
    blocked_on: NaiveDate,
    start_hour: i16,
    end_hour: i16,
    reason: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<BlackoutRow> for BlackoutInterval {
    fn from(row: BlackoutRow) -> BlackoutInterval {
        BlackoutInterval {
            id: row.id,
            ground_id: row.ground_id,
            date: row.blocked_on,
            start_hour: row.start_hour,
            end_hour: row.end_hour,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

#[derive(Insertable)]
#[table_name = "blackouts"]
struct NewBlackoutRow {
    ground_id: i64,
    blocked_on: NaiveDate,
    start_hour: i16,
    end_hour: i16,
    reason: Option<String>,
}

impl BlackoutRepo for PgStore {
    fn insert(
        &self,
        ground_id: i64,
        blackout: NewBlackout,
    ) -> Result<BlackoutInterval, StorageError> {
        let conn = self.conn()?;

        let row: BlackoutRow = diesel::insert_into(blackouts::table)
            .values(NewBlackoutRow {
                ground_id,
                blocked_on: blackout.date,
                start_hour: blackout.start_hour,
                end_hour: blackout.end_hour,
                reason: blackout.reason,
            })
            .get_result(&conn)?;

        Ok(row.into())
    }

    fn find(&self, id: i64) -> Result<Option<BlackoutInterval>, StorageError> {
        let conn = self.conn()?;

        let row = blackouts::table
            .find(id)
            .first::<BlackoutRow>(&conn)
            .optional()?;

        Ok(row.map(BlackoutInterval::from))
    }

    fn list_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<BlackoutInterval>, StorageError> {
        let conn = self.conn()?;

        let rows = blackouts::table
            .filter(blackouts::ground_id.eq(ground_id))
            .filter(blackouts::blocked_on.eq(date))
            .order(blackouts::start_hour.asc())
            .load::<BlackoutRow>(&conn)?;

        Ok(rows.into_iter().map(BlackoutInterval::from).collect())
    }

    fn delete(&self, id: i64) -> Result<(), StorageError> {
        let conn = self.conn()?;

        let deleted = diesel::delete(blackouts::table.find(id)).execute(&conn)?;

        if deleted == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[derive(Queryable)]
struct BookingRow {
    id: i64,
    ground_id: i64,
    slot_template_id: i64,
    booked_on: NaiveDate,
    user_id: i64,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl BookingRow {
    fn domain(self) -> Result<Booking, StorageError> {
        let status = self
            .status
            .parse()
            .map_err(|error: String| StorageError::Backend(error))?;

        Ok(Booking {
            id: self.id,
            ground_id: self.ground_id,
            slot_template_id: self.slot_template_id,
            date: self.booked_on,
            user_id: self.user_id,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[table_name = "bookings"]
struct NewBookingRow {
    ground_id: i64,
    slot_template_id: i64,
    booked_on: NaiveDate,
    user_id: i64,
    status: String,
}

impl BookingRepo for PgStore {
    fn insert(&self, booking: NewBooking) -> Result<Booking, StorageError> {
        let conn = self.conn()?;

        let row: BookingRow = diesel::insert_into(bookings::table)
            .values(NewBookingRow {
                ground_id: booking.ground_id,
                slot_template_id: booking.slot_template_id,
                booked_on: booking.date,
                user_id: booking.user_id,
                status: booking.status.to_string(),
            })
            .get_result(&conn)?;

        row.domain()
    }

    fn find(&self, id: i64) -> Result<Option<Booking>, StorageError> {
        let conn = self.conn()?;

        let row = bookings::table
            .find(id)
            .first::<BookingRow>(&conn)
            .optional()?;

        row.map(BookingRow::domain).transpose()
    }

    fn set_status(&self, id: i64, status: BookingStatus) -> Result<Booking, StorageError> {
        let conn = self.conn()?;

        let row: BookingRow = diesel::update(bookings::table.find(id))
            .set(bookings::status.eq(status.as_str()))
            .get_result(&conn)?;

        row.domain()
    }

    fn delete(&self, id: i64) -> Result<(), StorageError> {
        let conn = self.conn()?;

        let deleted = diesel::delete(bookings::table.find(id)).execute(&conn)?;

        if deleted == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    fn list_by_ground(&self, ground_id: i64) -> Result<Vec<Booking>, StorageError> {
        let conn = self.conn()?;

        let rows = bookings::table
            .filter(bookings::ground_id.eq(ground_id))
            .order(bookings::booked_on.desc())
            .load::<BookingRow>(&conn)?;

        rows.into_iter().map(BookingRow::domain).collect()
    }

    fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, StorageError> {
        let conn = self.conn()?;

        let rows = bookings::table
            .filter(bookings::user_id.eq(user_id))
            .order(bookings::booked_on.desc())
            .load::<BookingRow>(&conn)?;

        rows.into_iter().map(BookingRow::domain).collect()
    }

    fn active_for_date(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StorageError> {
        let conn = self.conn()?;

        let rows = bookings::table
            .filter(bookings::ground_id.eq(ground_id))
            .filter(bookings::booked_on.eq(date))
            .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
            .load::<BookingRow>(&conn)?;

        rows.into_iter().map(BookingRow::domain).collect()
    }

    fn count_active(&self) -> Result<i64, StorageError> {
        let conn = self.conn()?;

        let count = bookings::table
            .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
            .count()
            .get_result(&conn)?;

        Ok(count)
    }
}
