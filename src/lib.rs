pub mod api;
pub mod config;
pub mod data;
pub mod logging;
pub mod query;
pub mod routes;
pub mod schema;
pub mod ui;
