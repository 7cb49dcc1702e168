//! HTTP application wiring (axum router + shared services).
//!
//! - `routes/`: handlers (balance, history, transfer, health)
//! - `dto.rs`: request/response JSON shapes
//! - `errors.rs`: the `{code, message}` error body and status mapping
//! - `extract.rs`: extractors that keep rejections in the same JSON shape

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use ledgerd_convert::Convertor;
use ledgerd_store::LedgerStore;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;

/// Shared per-process services handed to every handler.
pub struct AppServices {
    pub store: Arc<dyn LedgerStore>,
    pub convertor: Convertor,
}

/// Build the full router (public entrypoint used by `main.rs` and tests).
pub fn build_app(store: Arc<dyn LedgerStore>, convertor: Convertor) -> Router {
    let services = Arc::new(AppServices { store, convertor });

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .fallback(routes::system::not_found)
        .layer(Extension(services))
}
