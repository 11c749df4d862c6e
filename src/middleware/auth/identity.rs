//! Identity gate for protected routes.
//!
//! - verified client certificate -> AuthCtx, nothing else touched
//! - otherwise security headers on the response, then session cookie -> AuthCtx
//! - no usable session -> 302 to the login page carrying the current URI as `returnURL`
//!
//! A redirect commits the response; the inner handler never runs.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use chrono::Utc;

use crate::api::extractors::{AuthCtx, AuthMethod};
use crate::api::response::found;
use crate::middleware::security_headers::set_security_headers;
use crate::services::auth::{
    ClientCertChain, Resolution,
    resolver::{login_redirect_target, resolve},
};
use crate::state::AppState;

/// Put `router` behind the identity gate.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, identity_middleware))
}

async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let resolution = resolve(
        req.extensions().get::<ClientCertChain>(),
        req.headers(),
        state.sessions.as_ref(),
        Utc::now(),
    );

    let (username, method) = match resolution {
        Resolution::Certificate(username) => {
            req.extensions_mut()
                .insert(AuthCtx::new(username, AuthMethod::Certificate));
            return next.run(req).await;
        }
        Resolution::Cookie(username) => (username, AuthMethod::Cookie),
        Resolution::Unauthenticated(reason) => {
            tracing::debug!(%reason, uri = %req.uri(), "redirecting to login");
            let mut resp = found(&login_redirect_target(req.uri()));
            set_security_headers(resp.headers_mut());
            return resp;
        }
    };

    req.extensions_mut().insert(AuthCtx::new(username, method));
    let mut resp = next.run(req).await;
    set_security_headers(resp.headers_mut());
    resp
}
