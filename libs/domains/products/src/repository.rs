use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct, UpdateReturn};

/// Persistence contract for products.
///
/// Absent records are `Ok(None)`; storage failures are
/// [`ProductError::Database`](crate::ProductError::Database).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every stored product, in insertion order
    async fn list_all(&self) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Assign id and `updated_time`, persist and return the record
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Merge the supplied fields atomically and return the record as
    /// selected by `returning`. An empty update returns the current record.
    async fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
        returning: UpdateReturn,
    ) -> ProductResult<Option<Product>>;

    /// Remove the record and return it
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn count(&self) -> ProductResult<u64>;
}
