use thiserror::Error;

use crate::domain::product::models::ProductId;
use crate::domain::store::StoreFailure;

/// Error for ProductId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid product id: {0}")]
    InvalidFormat(String),
}

/// Error for product name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductNameError {
    #[error("Name is required")]
    Blank,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for product description validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("Description is required")]
    Blank,

    #[error("Description too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for price validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price must not be negative")]
    Negative,

    #[error("Price is not a decimal number: {0}")]
    Malformed(String),

    #[error("Price exceeds the maximum of 99999999999999.9999")]
    OutOfRange,
}

/// Top-level error for catalog operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("Invalid product ID: {0}")]
    InvalidProductId(#[from] ProductIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] ProductNameError),

    #[error("Invalid description: {0}")]
    InvalidDescription(#[from] DescriptionError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The write committed but touched no row.
    #[error("Failed to {0} product")]
    NotPersisted(&'static str),

    #[error(transparent)]
    Store(#[from] StoreFailure),
}
