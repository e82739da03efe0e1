//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod bills;
pub mod collections;
pub mod health;
pub mod heads;
pub mod property;
pub mod reports;
pub mod vouchers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(heads::routes())
        .merge(property::routes())
        .merge(bills::routes())
        .merge(collections::routes())
        .merge(vouchers::routes())
        .merge(reports::routes())
}
