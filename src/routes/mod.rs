pub mod analytics;

pub use analytics::configure_analytics_routes;
