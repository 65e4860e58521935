use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/plan", post(handlers::create_plan_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/plan", get(handlers::get_plan).post(handlers::create_plan))
        .route("/api/weight", post(handlers::record_weight))
        .route("/api/water", post(handlers::record_water))
        .route("/api/reset", post(handlers::reset))
        .route("/api/foods", get(handlers::get_foods))
        .route("/api/recipes", get(handlers::get_recipes))
        .with_state(state)
}
