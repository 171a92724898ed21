//! Item lookup handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Item routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::search_items))
        .route("/fail", get(handler::fail))
        .route("/panic", get(handler::explode))
        .route("/{id}", get(handler::get_item))
}
