//! Authentication gateway: verified TLS client certificate or server-issued session
//! cookie, otherwise a redirect through `/login`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
pub mod tls;
