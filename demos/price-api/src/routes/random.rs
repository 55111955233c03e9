use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use price_data_sdk::models::Strategy;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RandomNumbersParams {
    pub strategy: String,
    pub count: usize,
}

/// POST /generate-random-numbers
///
/// Body: `{"strategy": "uniform", "count": 10}`. Counts above the SDK's
/// maximum answer 422.
pub async fn generate_random_numbers(
    State(state): State<Arc<AppState>>,
    Json(params): Json<RandomNumbersParams>,
) -> Result<Json<Value>, AppError> {
    let strategy: Strategy = params.strategy.parse()?;
    let numbers = state
        .sdk
        .generate_random_numbers(strategy, params.count)
        .await?;

    Ok(Json(json!({ "strategy": strategy, "numbers": numbers })))
}
