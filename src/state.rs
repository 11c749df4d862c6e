/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone: everything inside is behind an Arc
 * - The session store is owned here and injected into both login and the identity resolver
 */
use std::sync::Arc;

use crate::services::{auth::LoginService, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub login: Arc<LoginService>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionStore>, login: Arc<LoginService>) -> Self {
        Self { sessions, login }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("login", &self.login)
            .finish()
    }
}
