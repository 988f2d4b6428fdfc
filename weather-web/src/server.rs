//! HTTP routes for the weather page and the search endpoint.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use weather_core::{Config, SearchRequest, WeatherLookup};

use crate::auth;

const WEATHER_PAGE: &str = include_str!("../assets/weather.html");

/// Largest accepted request body.
const BODY_LIMIT: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct AppState {
    pub lookup: WeatherLookup,
    pub access_tokens: Arc<[String]>,
}

impl AppState {
    pub fn new(lookup: WeatherLookup, access_tokens: Vec<String>) -> Self {
        Self { lookup, access_tokens: access_tokens.into() }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let lookup = WeatherLookup::from_config(config).context("Failed to build weather client")?;
        Ok(Self::new(lookup, config.server.access_tokens.clone()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(show))
        .route("/weather/search", post(search))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C. `bind` overrides the configured address.
pub async fn serve(config: Config, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());

    if !config.is_guarded() {
        warn!("no access tokens configured, weather routes are open to everyone");
    }

    let app = router(AppState::from_config(&config)?);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Weather search running at http://{}/weather", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
    }
    info!("shutdown requested");
}

async fn show() -> Html<&'static str> {
    Html(WEATHER_PAGE)
}

async fn search(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

    let request = match SearchRequest::from_body(content_type, &body) {
        Ok(request) => request,
        Err(err) => {
            debug!(field = err.field(), message = err.message(), "search input rejected");
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(err.to_body())).into_response();
        }
    };

    let outcome = state.lookup.search(&request).await;
    let status = if outcome.is_not_found() { StatusCode::NOT_FOUND } else { StatusCode::OK };

    (status, Json(outcome.into_response())).into_response()
}
