use async_trait::async_trait;
use auth::PasswordDigest;
use sqlx::postgres::PgRow;
use sqlx::PgConnection;
use sqlx::PgPool;
use sqlx::Row;

use super::store::PgPersist;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::store::StoreFailure;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_identity(row: &PgRow) -> Result<Identity, StoreFailure> {
        let username: String = row.try_get("username")?;

        Ok(Identity {
            id: IdentityId(row.try_get("id")?),
            username: Username::new(username)
                .map_err(|e| StoreFailure::Database(format!("Stored username is invalid: {}", e)))?,
            password: PasswordDigest {
                hash: row.try_get("password_hash")?,
                salt: row.try_get("password_salt")?,
            },
        })
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, StoreFailure> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, password_salt
            FROM identities
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }
}

#[async_trait]
impl PgPersist for Identity {
    const INSERT_ONLY: bool = true;

    async fn insert(
        draft: NewIdentity,
        conn: &mut PgConnection,
    ) -> Result<Option<Identity>, sqlx::Error> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO identities (username, password_hash, password_salt)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(draft.username.as_str())
        .bind(&draft.password.hash)
        .bind(&draft.password.salt)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(id.map(|id| Identity {
            id: IdentityId(id),
            username: draft.username,
            password: draft.password,
        }))
    }
}
