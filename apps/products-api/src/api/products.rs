//! Products API routes

use axum::Router;
use domain_products::{handlers, MongoProductRepository, ProductService};

use crate::state::AppState;

fn repository(state: &AppState) -> MongoProductRepository {
    MongoProductRepository::with_collection(&state.db, &state.config.products.collection)
}

/// Create products router
pub fn router(state: &AppState) -> Router {
    let service = ProductService::with_config(repository(state), state.config.products.clone());
    handlers::router(service)
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state).init_indexes().await?;
    Ok(())
}
