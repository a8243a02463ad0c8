use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::store::StoreFailure;

/// Port for catalog operations.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// Create a product; its creation time is stamped before the write.
    ///
    /// # Errors
    /// * `NotPersisted` - Insert committed without effect
    /// * `Store` - Database operation failed
    async fn create_product(&self, command: CreateProductCommand)
        -> Result<Product, ProductError>;

    /// Retrieve a product by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `Store` - Database operation failed
    async fn get_product(&self, id: ProductId) -> Result<Product, ProductError>;

    /// List every product matching the filter. No pagination.
    ///
    /// # Errors
    /// * `Store` - Database operation failed
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductError>;

    /// Replace name, description and price of an existing product.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist, or vanished before the write
    /// * `Store` - Database operation failed
    async fn update_product(
        &self,
        id: ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError>;

    /// Physically delete a product.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist, or vanished before the write
    /// * `Store` - Database operation failed
    async fn delete_product(&self, id: ProductId) -> Result<(), ProductError>;
}

/// Read access to stored products.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Retrieve product by identifier.
    ///
    /// # Returns
    /// Optional product (None if not found)
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreFailure>;

    /// Retrieve products matching every present filter criterion, ordered by id.
    async fn find_matching(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreFailure>;
}
