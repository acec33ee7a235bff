//! # Folio API
//!
//! HTTP surface of the Folio token lifecycle: the bearer authentication gate,
//! login/refresh/logout endpoints, error mapping and the application factory.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
