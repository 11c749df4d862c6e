/*
 * Responsibility
 * - HTTP surface: routes, handlers, extractors, shared responses
 */
pub mod extractors;
pub mod handlers;
pub mod response;
mod routes;

pub use routes::{service_routes, status_routes};
