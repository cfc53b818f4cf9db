pub use weekdo_tui::cli;
pub use weekdo_tui::commands;
pub use weekdo_tui::config;
pub use weekdo_tui::logging;
pub use weekdo_tui::tui;
pub use weekdo_tui::AppConfig;

pub use weekdo_core as core;
pub use weekdo_core::database as db;
pub use weekdo_core::model;
pub use weekdo_core::ops;
pub use weekdo_core::services;
pub use weekdo_core::store;
pub use weekdo_core::week;
