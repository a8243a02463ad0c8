use async_trait::async_trait;
use sqlx::PgConnection;
use sqlx::PgPool;

use crate::domain::store::Entity;
use crate::domain::store::Mutation;
use crate::domain::store::MutationOutcome;
use crate::domain::store::StoreFailure;
use crate::domain::store::TransactionalStore;

/// SQL statements for one entity type, run on a connection the store controls.
///
/// Implementations only issue statements; they never begin, commit or roll back.
#[async_trait]
pub trait PgPersist: Entity {
    /// Entities that are only ever inserted. The store refuses updates and deletes
    /// for them without opening a transaction.
    const INSERT_ONLY: bool = false;

    /// Insert the draft and return the stored entity, or `None` if no row was written.
    async fn insert(draft: Self::Draft, conn: &mut PgConnection)
        -> Result<Option<Self>, sqlx::Error>;

    /// Write every mutable column; returns the number of affected rows.
    async fn update(&self, _conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
        Err(insert_only_error::<Self>("update"))
    }

    /// Remove the row; returns the number of affected rows.
    async fn delete(&self, _conn: &mut PgConnection) -> Result<u64, sqlx::Error> {
        Err(insert_only_error::<Self>("delete"))
    }
}

fn insert_only_error<E>(operation: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!(
        "{} is not supported for insert-only entity {}",
        operation,
        std::any::type_name::<E>()
    ))
}

/// PostgreSQL implementation of TransactionalStore.
///
/// Each `mutate` call takes its own connection from the pool and its own transaction.
/// The transaction is released before the call returns: committed on success, rolled
/// back on error, and rolled back on drop if the future is cancelled mid-way.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply<E: PgPersist>(
        mutation: Mutation<E>,
        conn: &mut PgConnection,
    ) -> Result<MutationOutcome<E>, sqlx::Error> {
        let outcome = match mutation {
            Mutation::Insert(draft) => match E::insert(draft, conn).await? {
                Some(entity) => MutationOutcome::Committed(entity),
                None => MutationOutcome::NoEffect,
            },
            Mutation::Update(entity) => match entity.update(conn).await? {
                0 => MutationOutcome::NoEffect,
                _ => MutationOutcome::Committed(entity),
            },
            Mutation::Delete(entity) => match entity.delete(conn).await? {
                0 => MutationOutcome::NoEffect,
                _ => MutationOutcome::Committed(entity),
            },
        };
        Ok(outcome)
    }
}

#[async_trait]
impl<E: PgPersist> TransactionalStore<E> for PostgresStore {
    async fn mutate(&self, mutation: Mutation<E>) -> Result<MutationOutcome<E>, StoreFailure> {
        let kind = mutation.kind();
        if E::INSERT_ONLY && !matches!(mutation, Mutation::Insert(_)) {
            let failure = StoreFailure::from(insert_only_error::<E>(kind));
            tracing::error!(operation = kind, error = %failure, "Mutation refused");
            return Err(failure);
        }

        let mut tx = self.pool.begin().await?;

        match Self::apply(mutation, &mut *tx).await {
            Ok(outcome) => {
                tx.commit().await?;
                match &outcome {
                    MutationOutcome::Committed(entity) => {
                        tracing::debug!(operation = kind, id = %entity.id(), "Mutation committed")
                    }
                    MutationOutcome::NoEffect => {
                        tracing::debug!(operation = kind, "Mutation committed without effect")
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::warn!(
                        operation = kind,
                        error = %rollback_error,
                        "Rollback failed; connection will be discarded"
                    );
                }
                let failure = StoreFailure::from(e);
                tracing::error!(operation = kind, error = %failure, "Mutation rolled back");
                Err(failure)
            }
        }
    }
}

impl From<sqlx::Error> for StoreFailure {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation() =>
            {
                StoreFailure::Conflict(err.to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreFailure::Unavailable(err.to_string()),
            _ => StoreFailure::Database(err.to_string()),
        }
    }
}
