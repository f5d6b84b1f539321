pub mod api;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
