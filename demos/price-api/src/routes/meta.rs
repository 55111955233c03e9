use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/meta
///
/// Returns the configured countries with their base prices and the number of
/// stored series.
pub async fn get_meta(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let (countries, stored) = state
        .sdk
        .run(|s| Ok((s.reference_tables().country_codes()?, s.prices().count()?)))
        .await?;

    Ok(Json(json!({
        "countries": countries,
        "stored_series": stored
    })))
}
