use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgConnection;
use sqlx::PgPool;
use sqlx::Row;

use super::store::PgPersist;
use crate::domain::product::models::NewProduct;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductDescription;
use crate::domain::product::models::ProductFilter;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductName;
use crate::domain::product::ports::ProductRepository;
use crate::domain::store::StoreFailure;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &PgRow) -> Result<Product, StoreFailure> {
        Ok(Product {
            id: ProductId(row.try_get("id")?),
            name: ProductName::new(row.try_get("name")?).map_err(|e| corrupt("name", e))?,
            description: ProductDescription::new(row.try_get("description")?)
                .map_err(|e| corrupt("description", e))?,
            price: Price::from_units(row.try_get("price_units")?)
                .map_err(|e| corrupt("price", e))?,
            created_at: row.try_get("created_at")?,
        })
    }
}

fn corrupt(field: &str, e: impl std::fmt::Display) -> StoreFailure {
    StoreFailure::Database(format!("Stored product {} is invalid: {}", field, e))
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreFailure> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price_units, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn find_matching(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreFailure> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price_units, created_at
            FROM products
            WHERE ($1::TEXT IS NULL OR strpos(name, $1) > 0)
              AND ($2::BIGINT IS NULL OR price_units >= $2)
              AND ($3::BIGINT IS NULL OR price_units <= $3)
            ORDER BY id
            "#,
        )
        .bind(filter.name.as_deref())
        .bind(filter.min_price.map(|p| p.units()))
        .bind(filter.max_price.map(|p| p.units()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_product).collect()
    }
}

#[async_trait]
impl PgPersist for Product {
    async fn insert(
        draft: NewProduct,
        conn: &mut PgConnection,
    ) -> Result<Option<Product>, sqlx::Error> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, description, price_units, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(draft.name.as_str())
        .bind(draft.description.as_str())
        .bind(draft.price.units())
        .bind(draft.created_at)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(id.map(|id| Product {
            id: ProductId(id),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            created_at: draft.created_at,
        }))
    }

    async fn update(&self, conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_units = $4
            WHERE id = $1
            "#,
        )
        .bind(self.id.0)
        .bind(self.name.as_str())
        .bind(self.description.as_str())
        .bind(self.price.units())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(self.id.0)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
