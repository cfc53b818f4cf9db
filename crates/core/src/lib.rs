pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod ops;
pub mod services;
pub mod store;
pub mod view;
pub mod week;

pub use config::AppConfig;
pub use database::Database;
pub use error::LoadError;
pub use model::*;
pub use services::{Action, Change, PlannerService, PlannerState};
pub use store::TaskMap;
pub use week::{WeekDay, WeekWindow};
