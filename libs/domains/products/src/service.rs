//! Product Service - policies between the HTTP layer and the repository

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::config::ProductsConfig;
use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, NotFoundPolicy, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product operations with the configured price, update-return and
/// missing-record policies applied.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    config: ProductsConfig,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    /// Service with [`ProductsConfig::default`]
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, ProductsConfig::default())
    }

    pub fn with_config(repository: R, config: ProductsConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            config,
        }
    }

    pub fn config(&self) -> &ProductsConfig {
        &self.config
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list_all().await
    }

    /// `Ok(None)` for a missing product unless the policy asks for 404
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.repository.get_by_id(id).await?;
        self.resolve_missing(id, product)
    }

    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        self.check_price(&input)?;
        self.repository.create(input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProduct,
    ) -> ProductResult<Option<Product>> {
        self.check_price(&input)?;
        let product = self
            .repository
            .update(id, input, self.config.update_returns)
            .await?;
        self.resolve_missing(id, product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.repository.delete(id).await?;
        self.resolve_missing(id, product)
    }

    fn check_price<T: Validate>(&self, input: &T) -> ProductResult<()> {
        if self.config.strict_price {
            input.validate()?;
        }
        Ok(())
    }

    fn resolve_missing(&self, id: Uuid, product: Option<Product>) -> ProductResult<Option<Product>> {
        match (product, self.config.not_found) {
            (None, NotFoundPolicy::Status404) => Err(ProductError::NotFound(id)),
            (product, _) => {
                if product.is_none() {
                    tracing::debug!(product_id = %id, "Product not found");
                }
                Ok(product)
            }
        }
    }
}
