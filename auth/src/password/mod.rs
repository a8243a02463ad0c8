pub mod errors;
pub mod hmac_sha512;

pub use errors::PasswordError;
pub use hmac_sha512::PasswordDigest;
pub use hmac_sha512::PasswordHasher;
