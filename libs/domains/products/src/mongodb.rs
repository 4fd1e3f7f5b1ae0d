//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::config::DEFAULT_COLLECTION;
use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct, UpdateReturn};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Repository over the `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Index on the caller-supplied catalogue number. Not unique: the
    /// API never rejected duplicates.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "prod_id": 1 })
            .options(
                IndexOptions::builder()
                    .sparse(true)
                    .name("idx_prod_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!(collection = %self.collection.name(), "Product indexes created");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.hyphenated().to_string() }
    }

    /// `$set` body holding only the fields present in `input`
    fn build_set_document(input: &UpdateProduct) -> Document {
        let mut set = Document::new();

        if let Some(name) = &input.name {
            set.insert("prod_name", name.as_str());
        }
        if let Some(price) = &input.price {
            set.insert("prod_price", price.as_str());
        }
        if let Some(code) = input.code {
            set.insert("prod_id", code);
        }
        if let Some(description) = &input.description {
            set.insert("prod_desc", description.as_str());
        }

        set
    }

    fn return_document(returning: UpdateReturn) -> ReturnDocument {
        match returning {
            UpdateReturn::After => ReturnDocument::After,
            UpdateReturn::Before => ReturnDocument::Before,
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
        returning: UpdateReturn,
    ) -> ProductResult<Option<Product>> {
        let set = Self::build_set_document(&input);
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let product = self
            .collection
            .find_one_and_update(Self::id_filter(id), doc! { "$set": set })
            .return_document(Self::return_document(returning))
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product updated");
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_delete(Self::id_filter(id))
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> ProductResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
