use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use price_data_sdk::{GeneratePricesParams, PriceResponse};

use crate::error::AppError;
use crate::state::AppState;

/// POST /model-prices
///
/// Body: `{"for_date": "2025-03-30", "country_code": "GB", "granularity": "h",
/// "commodity": "power"}`. Returns the stored series for the tuple, generating
/// it on first request. Unknown enum values answer 422.
pub async fn model_prices(
    State(state): State<Arc<AppState>>,
    Json(params): Json<GeneratePricesParams>,
) -> Result<Json<PriceResponse>, AppError> {
    let response = state.sdk.model_prices(params).await?;
    Ok(Json(response))
}
