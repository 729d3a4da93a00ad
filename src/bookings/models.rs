use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Anything not cancelled holds its slot.
    pub fn is_active(&self) -> bool {
        *self != BookingStatus::Cancelled
    }

    /// Legal transitions only move forward, cancelled is terminal.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(status: &str) -> Result<BookingStatus, Self::Err> {
        match status {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            unknown => Err(format!("unknown booking status: {}", unknown)),
        }
    }
}

/// One user holding one slot occurrence on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: i64,
    pub ground_id: i64,
    pub slot_template_id: i64,
    pub date: NaiveDate,
    pub user_id: i64,
    pub status: BookingStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row the ledger hands to the repository once its checks have passed.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub ground_id: i64,
    pub slot_template_id: i64,
    pub date: NaiveDate,
    pub user_id: i64,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationRequest {
    pub ground_id: i64,
    pub slot_template_id: i64,
    pub date: NaiveDate,
}
