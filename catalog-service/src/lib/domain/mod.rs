pub mod identity;
pub mod product;
pub mod store;
