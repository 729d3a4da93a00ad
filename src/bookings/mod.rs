pub mod ledger;
pub mod models;
pub mod routes;

pub use ledger::{BookingLedger, BookingRepo};
pub use models::{Booking, BookingStatus, NewBooking, ReservationRequest};
