pub mod category;
pub mod config;
pub mod date_range;
pub mod metrics;
pub mod portfolio;
pub mod price;
pub mod report;
pub mod settings;
pub mod stock;
