use axum::{
    Router,
    routing::{get, post},
};

pub mod balance;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route(
            "/balance",
            get(balance::get_balance).post(balance::adjust_balance),
        )
        .route("/balance/history", get(balance::get_history))
        .route("/balance/transfer", post(balance::transfer))
}
