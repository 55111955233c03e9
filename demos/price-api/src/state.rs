/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async SDK instance. Dispatches blocking DuckDB work to the
    /// runtime's blocking pool.
    pub sdk: price_data_sdk::AsyncPriceDataSdk,
}
