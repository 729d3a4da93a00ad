use std::collections::HashSet;

use chrono::NaiveDate;

use crate::bookings::ledger::BookingLedger;
use crate::errors::ServiceError;
use crate::slots::blackouts::BlackoutRegistry;
use crate::slots::models::SlotTemplate;
use crate::slots::recurrence;
use crate::slots::store::SlotTemplateStore;

/// A concrete bookable occurrence: one template projected onto one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotInstance {
    pub slot_template_id: i64,
    pub ground_id: i64,
    pub date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub price: i64,
    pub duration: i16,
}

impl SlotInstance {
    fn project(template: &SlotTemplate, date: NaiveDate) -> SlotInstance {
        SlotInstance {
            slot_template_id: template.id,
            ground_id: template.ground_id,
            date,
            start_hour: template.start_hour,
            end_hour: template.end_hour,
            price: template.price,
            duration: template.duration,
        }
    }
}

/// Computes what can actually be booked on a ground for a given day:
/// templates that occur on the date, minus anything a blackout touches,
/// minus anything already held by an active booking.
#[derive(Clone)]
pub struct AvailabilityResolver {
    templates: SlotTemplateStore,
    blackouts: BlackoutRegistry,
    ledger: BookingLedger,
}

impl AvailabilityResolver {
    pub fn new(
        templates: SlotTemplateStore,
        blackouts: BlackoutRegistry,
        ledger: BookingLedger,
    ) -> AvailabilityResolver {
        AvailabilityResolver {
            templates,
            blackouts,
            ledger,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn available_slots(
        &self,
        ground_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<SlotInstance>, ServiceError> {
        let templates = self.templates.list(ground_id)?;
        let blackouts = self.blackouts.list_for_date(ground_id, date)?;

        let booked: HashSet<i64> = self
            .ledger
            .active_for_date(ground_id, date)?
            .iter()
            .map(|booking| booking.slot_template_id)
            .collect();

        let mut instances: Vec<SlotInstance> = templates
            .iter()
            .filter(|template| recurrence::occurs_on(template, date))
            .filter(|template| {
                !blackouts
                    .iter()
                    .any(|blackout| blackout.overlaps(template.start_hour, template.end_hour))
            })
            .filter(|template| !booked.contains(&template.id))
            .map(|template| SlotInstance::project(template, date))
            .collect();

        instances.sort_by_key(|instance| instance.start_hour);

        Ok(instances)
    }
}
