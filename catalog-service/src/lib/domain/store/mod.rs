pub mod errors;
pub mod models;
pub mod ports;

pub use errors::StoreFailure;
pub use models::Entity;
pub use models::Mutation;
pub use models::MutationOutcome;
pub use ports::TransactionalStore;
