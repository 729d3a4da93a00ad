pub mod models;
pub mod routes;
pub mod store;

pub use models::{CreateGround, Ground, GroundFilter, UpdateGround};
pub use store::{GroundRepo, GroundStore};
