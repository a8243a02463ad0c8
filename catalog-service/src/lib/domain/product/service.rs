use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::NewProduct;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::ports::ProductRepository;
use crate::domain::product::ports::ProductServicePort;
use crate::domain::store::Mutation;
use crate::domain::store::MutationOutcome;
use crate::domain::store::TransactionalStore;

/// Domain service for catalog operations.
///
/// Every write goes through the transactional store, one transaction per call.
pub struct ProductService<PR, S>
where
    PR: ProductRepository,
    S: TransactionalStore<Product>,
{
    repository: Arc<PR>,
    store: Arc<S>,
}

impl<PR, S> ProductService<PR, S>
where
    PR: ProductRepository,
    S: TransactionalStore<Product>,
{
    /// Create a new product service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Product reads
    /// * `store` - Transactional writes
    pub fn new(repository: Arc<PR>, store: Arc<S>) -> Self {
        Self { repository, store }
    }

    async fn fetch(&self, id: ProductId) -> Result<Product, ProductError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }
}

#[async_trait]
impl<PR, S> ProductServicePort for ProductService<PR, S>
where
    PR: ProductRepository,
    S: TransactionalStore<Product>,
{
    async fn create_product(
        &self,
        command: CreateProductCommand,
    ) -> Result<Product, ProductError> {
        let draft = NewProduct::from_command(command);

        let product = self
            .store
            .mutate(Mutation::Insert(draft))
            .await?
            .into_committed()
            .ok_or(ProductError::NotPersisted("create"))?;

        tracing::info!(product_id = %product.id, price = %product.price, "Product created");
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ProductError> {
        self.fetch(id).await
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ProductError> {
        Ok(self.repository.find_matching(&filter).await?)
    }

    async fn update_product(
        &self,
        id: ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError> {
        let mut product = self.fetch(id).await?;
        product.apply(command);

        match self.store.mutate(Mutation::Update(product)).await? {
            MutationOutcome::Committed(updated) => {
                tracing::info!(product_id = %id, "Product updated");
                Ok(updated)
            }
            MutationOutcome::NoEffect => {
                tracing::warn!(product_id = %id, "Product vanished before update");
                Err(ProductError::NotFound(id))
            }
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        let product = self.fetch(id).await?;

        match self.store.mutate(Mutation::Delete(product)).await? {
            MutationOutcome::Committed(_) => {
                tracing::info!(product_id = %id, "Product deleted");
                Ok(())
            }
            MutationOutcome::NoEffect => {
                tracing::warn!(product_id = %id, "Product vanished before delete");
                Err(ProductError::NotFound(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::product::models::Price;
    use crate::domain::product::models::ProductDescription;
    use crate::domain::product::models::ProductName;
    use crate::domain::store::StoreFailure;

    mock! {
        pub TestProductRepository {}

        #[async_trait]
        impl ProductRepository for TestProductRepository {
            async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreFailure>;
            async fn find_matching(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreFailure>;
        }
    }

    mock! {
        pub TestProductStore {}

        #[async_trait]
        impl TransactionalStore<Product> for TestProductStore {
            async fn mutate(&self, mutation: Mutation<Product>) -> Result<MutationOutcome<Product>, StoreFailure>;
        }
    }

    fn pen(id: i64) -> Product {
        Product {
            id: ProductId(id),
            name: ProductName::new("Pen".to_string()).unwrap(),
            description: ProductDescription::new("Blue pen".to_string()).unwrap(),
            price: Price::parse("1.5").unwrap(),
            created_at: Utc::now(),
        }
    }

    fn update_command() -> UpdateProductCommand {
        UpdateProductCommand {
            name: ProductName::new("Marker".to_string()).unwrap(),
            description: ProductDescription::new("Black marker".to_string()).unwrap(),
            price: Price::parse("2.75").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_product_success() {
        let repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        let before = Utc::now();
        store
            .expect_mutate()
            .withf(move |mutation| match mutation {
                Mutation::Insert(draft) => {
                    draft.name.as_str() == "Pen"
                        && draft.price.units() == 15_000
                        && draft.created_at >= before
                }
                _ => false,
            })
            .times(1)
            .returning(|mutation| match mutation {
                Mutation::Insert(draft) => Ok(MutationOutcome::Committed(Product {
                    id: ProductId(1),
                    name: draft.name,
                    description: draft.description,
                    price: draft.price,
                    created_at: draft.created_at,
                })),
                _ => unreachable!(),
            });

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let product = service
            .create_product(CreateProductCommand {
                name: ProductName::new("Pen".to_string()).unwrap(),
                description: ProductDescription::new("Blue pen".to_string()).unwrap(),
                price: Price::parse("1.50").unwrap(),
            })
            .await
            .expect("create failed");

        assert_eq!(product.id, ProductId(1));
        assert_eq!(product.price.to_string(), "1.5000");
    }

    #[tokio::test]
    async fn test_create_product_without_effect() {
        let repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        store
            .expect_mutate()
            .times(1)
            .returning(|_| Ok(MutationOutcome::NoEffect));

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let result = service
            .create_product(CreateProductCommand {
                name: ProductName::new("Pen".to_string()).unwrap(),
                description: ProductDescription::new("Blue pen".to_string()).unwrap(),
                price: Price::ZERO,
            })
            .await;
        assert!(matches!(result, Err(ProductError::NotPersisted("create"))));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut repository = MockTestProductRepository::new();
        let store = MockTestProductStore::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let result = service.get_product(ProductId(99)).await;
        assert!(matches!(result, Err(ProductError::NotFound(ProductId(99)))));
    }

    #[tokio::test]
    async fn test_list_products_forwards_filter() {
        let mut repository = MockTestProductRepository::new();
        let store = MockTestProductStore::new();

        let expected = ProductFilter::new(
            Some("Pen".to_string()),
            Some(Price::parse("2.0").unwrap()),
            Some(Price::parse("5.0").unwrap()),
        );
        let matcher = expected.clone();
        repository
            .expect_find_matching()
            .withf(move |filter| *filter == matcher)
            .times(1)
            .returning(|_| Ok(vec![pen(1), pen(2)]));

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let products = service.list_products(expected).await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_update_product_success() {
        let mut repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        let existing = pen(5);
        let created_at = existing.created_at;
        repository
            .expect_find_by_id()
            .withf(|id| *id == ProductId(5))
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        store
            .expect_mutate()
            .withf(move |mutation| match mutation {
                Mutation::Update(product) => {
                    product.name.as_str() == "Marker"
                        && product.description.as_str() == "Black marker"
                        && product.price.to_string() == "2.7500"
                        && product.created_at == created_at
                }
                _ => false,
            })
            .times(1)
            .returning(|mutation| match mutation {
                Mutation::Update(product) => Ok(MutationOutcome::Committed(product)),
                _ => unreachable!(),
            });

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let updated = service
            .update_product(ProductId(5), update_command())
            .await
            .unwrap();
        assert_eq!(updated.name.as_str(), "Marker");
    }

    #[tokio::test]
    async fn test_update_product_not_found() {
        let mut repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_mutate().times(0);

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let result = service.update_product(ProductId(404), update_command()).await;
        assert!(matches!(result, Err(ProductError::NotFound(ProductId(404)))));
    }

    #[tokio::test]
    async fn test_update_product_vanished_before_write() {
        let mut repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(pen(id.0))));
        store
            .expect_mutate()
            .times(1)
            .returning(|_| Ok(MutationOutcome::NoEffect));

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let result = service.update_product(ProductId(5), update_command()).await;
        assert!(matches!(result, Err(ProductError::NotFound(ProductId(5)))));
    }

    #[tokio::test]
    async fn test_update_product_store_failure() {
        let mut repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(pen(id.0))));
        store
            .expect_mutate()
            .times(1)
            .returning(|_| Err(StoreFailure::Unavailable("connection reset".to_string())));

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        let result = service.update_product(ProductId(5), update_command()).await;
        assert!(matches!(
            result,
            Err(ProductError::Store(StoreFailure::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let mut repository = MockTestProductRepository::new();
        let mut store = MockTestProductStore::new();

        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&lookups);
        repository
            .expect_find_by_id()
            .times(2)
            .returning(move |id| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(Some(pen(id.0)))
                } else {
                    Ok(None)
                }
            });

        store
            .expect_mutate()
            .withf(|mutation| matches!(mutation, Mutation::Delete(p) if p.id == ProductId(3)))
            .times(1)
            .returning(|mutation| match mutation {
                Mutation::Delete(product) => Ok(MutationOutcome::Committed(product)),
                _ => unreachable!(),
            });

        let service = ProductService::new(Arc::new(repository), Arc::new(store));

        assert!(service.delete_product(ProductId(3)).await.is_ok());
        let second = service.delete_product(ProductId(3)).await;
        assert!(matches!(second, Err(ProductError::NotFound(ProductId(3)))));
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }
}
