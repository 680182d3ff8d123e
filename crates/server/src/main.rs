use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use shared::protocol::{COUNTRY_ROUTE, HEALTH_ROUTE};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod country;

use app_state::AppState;
use config::{load_settings, prepare_upstream_base_url};
use country::{lookup_country, CountryResponse, WorldBankClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let upstream_base_url = prepare_upstream_base_url(&settings.upstream_base_url)?;
    let state = AppState {
        world_bank: WorldBankClient::new(upstream_base_url),
    };
    info!(upstream = %state.world_bank.base_url(), "using upstream");
    let app = build_router(Arc::new(state), settings.cors_permissive);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(COUNTRY_ROUTE, get(country_lookup))
        .with_state(state);

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn country_lookup(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> CountryResponse {
    lookup_country(&state.world_bank, &code).await
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
