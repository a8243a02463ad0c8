pub mod identity;
pub mod product;
pub mod store;

pub use identity::PostgresIdentityRepository;
pub use product::PostgresProductRepository;
pub use store::PostgresStore;
