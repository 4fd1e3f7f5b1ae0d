//! In-memory implementation of ProductRepository

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct, UpdateReturn};
use crate::repository::ProductRepository;

/// Products held in a `Vec` behind a `RwLock`, in insertion order.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `products`
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products.write().await.push(product.clone());
        tracing::debug!(product_id = %product.id, "Product stored in memory");
        Ok(product)
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
        returning: UpdateReturn,
    ) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        let before = product.clone();
        product.apply(input);

        Ok(Some(match returning {
            UpdateReturn::After => product.clone(),
            UpdateReturn::Before => before,
        }))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        let removed = products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index));
        Ok(removed)
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_a() -> CreateProduct {
        CreateProduct {
            name: Some("Product A".into()),
            price: Some("10000".into()),
            code: Some(1),
            description: Some("Description A".into()),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_supplied_fields() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product_a()).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name.as_deref(), Some("Product A"));
        assert_eq!(fetched.price.as_deref(), Some("10000"));
        assert_eq!(fetched.description.as_deref(), Some("Description A"));
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let repo = InMemoryProductRepository::new();
        let mut ids = Vec::new();
        for n in 0..3 {
            let input = CreateProduct {
                name: Some(format!("Product {n}")),
                ..Default::default()
            };
            ids.push(repo.create(input).await.unwrap().id);
        }

        let listed: Vec<Uuid> = repo.list_all().await.unwrap().iter().map(|p| p.id).collect();

        assert_eq!(listed, ids);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_after_and_before() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product_a()).await.unwrap();
        let rename = |name: &str| UpdateProduct {
            name: Some(name.into()),
            ..Default::default()
        };

        let after = repo
            .update(created.id, rename("X"), UpdateReturn::After)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.name.as_deref(), Some("X"));
        assert_eq!(after.price, created.price);
        assert_eq!(after.description, created.description);
        assert_eq!(after.updated_time, created.updated_time);

        let before = repo
            .update(created.id, rename("Y"), UpdateReturn::Before)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.name.as_deref(), Some("X"));

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("Y"));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_return_none() {
        let repo = InMemoryProductRepository::new();
        let id = Uuid::now_v7();

        let updated = repo
            .update(id, UpdateProduct::default(), UpdateReturn::After)
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(repo.delete(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product_a()).await.unwrap();

        let deleted = repo.delete(created.id).await.unwrap();

        assert_eq!(deleted, Some(created.clone()));
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
