/*
 * Responsibility
 * - Config -> shared state -> routers
 * - Service listener (TLS with optional client certificates, or plain HTTP) + status listener
 * - Process-wide tracing and panic hook
 */
use std::net::SocketAddr;
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{HeaderIdentityExtractor, LoginService};
use crate::services::session::{InMemorySessionStore, SessionStore, spawn_sweeper};
use crate::state::AppState;
use crate::tls::{ClientCertAcceptor, load_server_config};

fn init_tracing() {
    // RUST_LOG wins; e.g. RUST_LOG=info,session_gate=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default behaviour, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        app_env = ?config.app_env,
        service_addr = %config.service_addr,
        status_addr = %config.status_addr,
        tls = config.tls.is_some(),
        client_certificates = config
            .tls
            .as_ref()
            .is_some_and(|t| t.client_ca_filename.is_some()),
        session_lifetime_hours = config.session_lifetime_hours,
        "starting gateway"
    );
    tracing::info!(
        url = config.account_configuration_url.as_deref().unwrap_or("<unset>"),
        check_interval_secs = config.account_configuration_check_interval.as_secs(),
        identity_header = %config.identity_header,
        "identity provider settings"
    );

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    if !config.session_sweep_interval.is_zero() {
        spawn_sweeper(sessions.clone(), config.session_sweep_interval);
    }

    let state = build_state(&config, sessions);

    let service = build_service_router(state.clone());
    let status = build_status_router(state);

    tokio::try_join!(
        serve_service(&config, service),
        serve_status(config.status_addr, status),
    )?;

    Ok(())
}

fn build_state(config: &Config, sessions: Arc<dyn SessionStore>) -> AppState {
    let extractor = Arc::new(HeaderIdentityExtractor::new(config.identity_header.clone()));
    let login = LoginService::new(extractor, sessions.clone(), config.session_lifetime());

    AppState::new(sessions, Arc::new(login))
}

fn build_service_router(state: AppState) -> Router {
    let router = api::service_routes(state.clone()).with_state(state);
    middleware::http::apply(router)
}

fn build_status_router(state: AppState) -> Router {
    let router = api::status_routes().with_state(state);
    middleware::http::apply(router)
}

async fn serve_service(config: &Config, router: Router) -> Result<()> {
    match &config.tls {
        Some(files) => {
            let tls_config = load_server_config(files).context("loading TLS configuration")?;
            axum_server::bind(config.service_addr)
                .acceptor(ClientCertAcceptor::new(tls_config))
                .serve(router.into_make_service())
                .await
                .context("service listener")?;
        }
        None => {
            tracing::warn!("no TLS configured; service listener speaks plain HTTP");
            let listener = tokio::net::TcpListener::bind(config.service_addr)
                .await
                .with_context(|| format!("binding {}", config.service_addr))?;
            axum::serve(listener, router)
                .await
                .context("service listener")?;
        }
    }
    Ok(())
}

async fn serve_status(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, router)
        .await
        .context("status listener")?;
    Ok(())
}
