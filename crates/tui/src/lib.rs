pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use weekdo_core as core;
pub use weekdo_core::model;
pub use weekdo_core::ops;
pub use weekdo_core::services;
pub use weekdo_core::store;
pub use weekdo_core::week;

pub use weekdo_core::AppConfig;
