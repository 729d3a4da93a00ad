use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::ServiceError;
use crate::validator::{validate_hour_range, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(frequency: &str) -> Result<Frequency, Self::Err> {
        match frequency {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            unknown => Err(format!("unknown recurrence frequency: {}", unknown)),
        }
    }
}

/// "Every `interval` days/weeks/months, until `until` (inclusive) if set."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: i32,
    pub until: Option<NaiveDate>,
}

/// A bookable window a ground offers. Occurrences are computed on demand
/// from `start_date` and `rule`, never materialized as rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotTemplate {
    pub id: i64,
    pub ground_id: i64,
    pub start_hour: i16,
    pub end_hour: i16,
    /// Price for one occurrence, in the smallest currency unit.
    pub price: i64,
    pub duration: i16,
    pub recurring: bool,
    pub start_date: NaiveDate,
    pub rule: Option<RecurrenceRule>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewSlotTemplate {
    pub start_hour: i16,
    pub end_hour: i16,
    pub price: i64,
    pub duration: i16,
    #[serde(default)]
    pub recurring: bool,
    pub start_date: NaiveDate,
    pub rule: Option<RecurrenceRule>,
}

/// Payload for the recurring-slot endpoint: the template and its rule
/// travel as separate objects.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurringSlotRequest {
    pub slot: NewSlotTemplate,
    pub rule: RecurrenceRule,
}

impl Validate<NewSlotTemplate> for NewSlotTemplate {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_hour_range(self.start_hour, self.end_hour)?;

        if self.price <= 0 {
            bad_request!("the slot price should be greater than zero");
        }

        if !(1..=24).contains(&self.duration) {
            bad_request!("the slot duration should be between 1 and 24 hours");
        }

        match (&self.rule, self.recurring) {
            (Some(_), false) => {
                bad_request!("a slot with a recurrence rule should be marked recurring")
            }
            (None, true) => bad_request!("a recurring slot needs a recurrence rule"),
            _ => {}
        }

        if let Some(rule) = &self.rule {
            if rule.interval <= 0 {
                bad_request!("the recurrence interval should be at least 1");
            }

            if let Some(until) = rule.until {
                if until < self.start_date {
                    bad_request!("the recurrence end should not precede the start date");
                }
            }
        }

        Ok(())
    }
}

/// A per-date block the owner places over part of a ground's day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlackoutInterval {
    pub id: i64,
    pub ground_id: i64,
    pub date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl BlackoutInterval {
    /// Half-open hour windows: touching edges do not overlap.
    pub fn overlaps(&self, start_hour: i16, end_hour: i16) -> bool {
        self.start_hour < end_hour && start_hour < self.end_hour
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBlackout {
    pub date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub reason: Option<String>,
}

impl Validate<NewBlackout> for NewBlackout {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_hour_range(self.start_hour, self.end_hour)
    }
}
