mod actions;
pub mod models;

use std::net::SocketAddr;

use alloy::primitives::Address;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lending_validation::{AccountAggregator, ValidationError, ValidatorConfig};
use tracing::info;

pub use actions::ActionRequest;
use models::{AccountResponse, ErrorBody, HealthResponse, PositionDisplay, ValidationResponse};

use crate::snapshot_refresher::SharedSnapshot;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: SharedSnapshot,
    pub validator_config: ValidatorConfig,
    pub max_cap_on_health_factor: u64,
}

/// Validation failure surfaced as `422 Unprocessable Entity`
pub struct ApiError(ValidationError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::from(&self.0)),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/accounts/:user", get(account))
        .route("/validate", post(validate))
        .with_state(state)
}

pub async fn start_api_server(state: AppState, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    info!("Starting validation API on {}", addr);
    axum::Server::bind(&addr)
        .serve(router(state).into_make_service())
        .await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.snapshot.read().await.clone();
    Json(HealthResponse {
        status: "OK".to_string(),
        block_number: snapshot.block_number,
        snapshot_age_seconds: snapshot.age_seconds(chrono::Utc::now()),
    })
}

async fn account(
    State(state): State<AppState>,
    Path(user): Path<Address>,
) -> Result<Json<AccountResponse>, ApiError> {
    let snapshot = state.snapshot.read().await.clone();
    let user_config = snapshot.user_configuration(&user);

    let position = AccountAggregator::compute_account_data(&user, &snapshot.view(), &user_config)
        .map_err(ApiError)?;
    let available_borrows = AccountAggregator::available_borrows(&position)
        .map_err(|e| ApiError(e.into()))?;

    Ok(Json(AccountResponse {
        user,
        block_number: snapshot.block_number,
        display: PositionDisplay::new(
            &position,
            available_borrows,
            state.max_cap_on_health_factor,
        ),
        liquidatable: AccountAggregator::is_liquidatable(&position),
        available_borrows,
        position,
    }))
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Json<ValidationResponse> {
    let snapshot = state.snapshot.read().await.clone();
    let result = request.validate(&snapshot, &state.validator_config);

    match &result {
        Ok(()) => info!(
            "Accepted {} at block {}",
            request.name(),
            snapshot.block_number
        ),
        Err(e) => info!(
            "Rejected {} at block {}: {}",
            request.name(),
            snapshot.block_number,
            e.kind()
        ),
    }

    Json(ValidationResponse::from(result))
}
