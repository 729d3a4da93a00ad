use chrono::{Datelike, NaiveDate};

use crate::slots::models::{Frequency, SlotTemplate};

/// Whether `template` produces an occurrence on `date`.
///
/// Occurrences are never materialized, this predicate is evaluated lazily
/// against the anchor `start_date` whenever a day is resolved. A template
/// without a rule occurs exactly once, on its start date.
pub fn occurs_on(template: &SlotTemplate, date: NaiveDate) -> bool {
    let rule = match (&template.rule, template.recurring) {
        (Some(rule), true) => rule,
        _ => return date == template.start_date,
    };

    if date < template.start_date {
        return false;
    }

    // `until` is the last permitted date
    if let Some(until) = rule.until {
        if date > until {
            return false;
        }
    }

    // intervals below 1 never divide, clamp instead of panicking on a bad row
    let interval = i64::from(rule.interval.max(1));
    let elapsed_days = date.signed_duration_since(template.start_date).num_days();

    match rule.frequency {
        Frequency::Daily => elapsed_days % interval == 0,
        Frequency::Weekly => {
            date.weekday() == template.start_date.weekday() && (elapsed_days / 7) % interval == 0
        }
        Frequency::Monthly => {
            // the anchor day of month never rolls over: a day-31 series
            // simply skips months that are too short
            date.day() == template.start_date.day()
                && months_between(template.start_date, date) % interval == 0
        }
    }
}

fn months_between(start: NaiveDate, date: NaiveDate) -> i64 {
    let years = i64::from(date.year()) - i64::from(start.year());
    let months = i64::from(date.month()) - i64::from(start.month());

    years * 12 + months
}
