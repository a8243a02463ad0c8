//! Credential utilities library
//!
//! Provides the credential and session building blocks used by the catalog service:
//! - Password hashing (HMAC-SHA-512 keyed by a per-identity random secret)
//! - JWT token generation and validation (HS256, issuer and audience aware)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &digest.hash, &digest.salt).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!")
//!     .with_issuer("catalog")
//!     .with_audience("catalog-clients");
//! let auth = Authenticator::new(handler, 6);
//!
//! // Register: hash password
//! let digest = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = auth.claims_for(1, "alice");
//! let result = auth.authenticate("password123", &digest, &claims).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.username(), Some("alice"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordDigest;
pub use password::PasswordError;
pub use password::PasswordHasher;
