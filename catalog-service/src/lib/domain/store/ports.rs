use async_trait::async_trait;

use super::errors::StoreFailure;
use super::models::Entity;
use super::models::Mutation;
use super::models::MutationOutcome;

/// Atomic single-entity writes.
#[async_trait]
pub trait TransactionalStore<E: Entity>: Send + Sync + 'static {
    /// Apply one mutation inside its own transaction.
    ///
    /// The transaction is opened and closed within the call: it commits when the
    /// statement succeeds (even if it affected no rows) and rolls back otherwise.
    ///
    /// # Arguments
    /// * `mutation` - Insert, update or delete of a single entity
    ///
    /// # Returns
    /// * `Committed` - The write affected a row
    /// * `NoEffect` - The write committed without affecting any row
    ///
    /// # Errors
    /// * `Conflict` - A store-enforced constraint rejected the write
    /// * `Unavailable` - The store could not be reached
    /// * `Database` - Any other store failure
    async fn mutate(&self, mutation: Mutation<E>) -> Result<MutationOutcome<E>, StoreFailure>;
}
