use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use price_data_sdk::{CountryCode, Granularity};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FlatPricesParams {
    pub country_code: String,
    pub granularity: String,
}

/// POST /generate-flat-prices
///
/// Body: `{"country_code": "NL", "granularity": "hh"}`. Unshaped draws around
/// the country's base price; nothing is stored.
pub async fn generate_flat_prices(
    State(state): State<Arc<AppState>>,
    Json(params): Json<FlatPricesParams>,
) -> Result<Json<Value>, AppError> {
    let country: CountryCode = params.country_code.parse()?;
    let granularity: Granularity = params.granularity.parse()?;
    let prices = state.sdk.generate_flat_prices(country, granularity).await?;

    Ok(Json(json!({
        "country_code": country,
        "granularity": granularity,
        "prices": prices
    })))
}
