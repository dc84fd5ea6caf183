pub mod analytics_service;
pub mod metrics_service;
pub mod portfolio_service;
pub mod price_service;
