pub mod blackouts;
pub mod models;
pub mod recurrence;
pub mod routes;
pub mod store;

pub use blackouts::{BlackoutRegistry, BlackoutRepo};
pub use models::{BlackoutInterval, NewBlackout, NewSlotTemplate, RecurrenceRule, SlotTemplate};
pub use store::{SlotTemplateStore, TemplateRepo};
