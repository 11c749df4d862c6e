/*
 * Responsibility
 * - URL layout of both listeners
 * - /login stays outside the identity gate; everything else on the service listener is behind it
 */
use axum::{Router, routing::get};

use crate::api::handlers::{health::health, login::login, whoami::whoami};
use crate::middleware;
use crate::services::auth::LOGIN_PATH;
use crate::state::AppState;

pub fn service_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(whoami))
        .route("/whoami", get(whoami));
    let protected = middleware::auth::identity::apply(protected, state);

    Router::new()
        .route(LOGIN_PATH, get(login).post(login))
        .merge(protected)
}

pub fn status_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
