// HTTP Server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

// Relay service
pub mod relay;

// Assistant provider layer
pub mod assistant;

pub mod config;
pub mod logging;
