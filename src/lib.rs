pub mod config;
pub mod coordinator;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod mock;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod rate_limit;
pub mod state;
