use crate::config::Config;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use sealward_core::{
    DepartureResponse, FinalizeArrivalOperationRequest, FinalizeResponse, LocalClock,
    LocatePendingOperationRequest, LocateResponse, OutcomeStatus,
    RegisterDepartureOperationRequest, Result, SealRegistry,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct ServerState {
    pub registry: SealRegistry,
}

pub async fn run_server(config: Config) -> Result<()> {
    let store = config.row_store_builder().build()?;
    let resolver = config.blob_resolver_builder().build()?;

    tracing::info!("Row store backend: {}", config.store.backend.as_str());

    let registry = SealRegistry::with_options(
        store,
        resolver,
        Arc::new(LocalClock),
        config.register_settings(),
    );

    let state = Arc::new(ServerState { registry });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/departures", post(register_departure))
        .route("/arrivals/search", post(locate_pending))
        .route("/arrivals/finalize", post(finalize_arrival))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn status_code(status: OutcomeStatus) -> StatusCode {
    match status {
        OutcomeStatus::Success => StatusCode::OK,
        OutcomeStatus::Validation => StatusCode::BAD_REQUEST,
        OutcomeStatus::Conflict => StatusCode::CONFLICT,
        OutcomeStatus::NotFound => StatusCode::NOT_FOUND,
        OutcomeStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Logs a body that could not be read into a request and returns the
/// message sent back in its place. Serde's wording stays in the log.
fn rejected(route: &str, rejection: JsonRejection) -> String {
    tracing::warn!("Rejected {} body: {}", route, rejection.body_text());
    "Request body is malformed or is missing required fields.".to_string()
}

async fn register_departure(
    State(state): State<Arc<ServerState>>,
    payload: std::result::Result<Json<RegisterDepartureOperationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let response = match payload {
        Ok(Json(request)) => state.registry.register_departure(request).await,
        Err(rejection) => DepartureResponse {
            status: OutcomeStatus::Validation,
            message: rejected("departure", rejection),
            void_seal: None,
        },
    };
    (status_code(response.status), Json(response))
}

async fn locate_pending(
    State(state): State<Arc<ServerState>>,
    payload: std::result::Result<Json<LocatePendingOperationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let response = match payload {
        Ok(Json(request)) => state.registry.locate_pending(request).await,
        Err(rejection) => LocateResponse {
            status: OutcomeStatus::Validation,
            message: rejected("search", rejection),
            record: None,
        },
    };
    (status_code(response.status), Json(response))
}

async fn finalize_arrival(
    State(state): State<Arc<ServerState>>,
    payload: std::result::Result<Json<FinalizeArrivalOperationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let response = match payload {
        Ok(Json(request)) => state.registry.finalize_arrival(request).await,
        Err(rejection) => FinalizeResponse {
            status: OutcomeStatus::Validation,
            message: rejected("finalize", rejection),
        },
    };
    (status_code(response.status), Json(response))
}
