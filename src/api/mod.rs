use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{quote::post_quote, readiness::status, trade::post_trade};
use crate::models::state::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/quote", post(post_quote))
        .route("/trade", post(post_trade))
        .route("/status", get(status))
        .with_state(app_state)
}
