use hmac::Hmac;
use hmac::Mac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;

use super::errors::PasswordError;

type HmacSha512 = Hmac<Sha512>;

/// Output length of HMAC-SHA-512 in bytes.
pub const HASH_LENGTH: usize = 64;

/// Length of the per-identity secret in bytes (one SHA-512 block).
pub const SALT_LENGTH: usize = 128;

/// Keyed password hash together with the secret that produced it.
///
/// The two halves are only meaningful as a pair and are always stored together.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("hash", &format_args!("<{} bytes>", self.hash.len()))
            .field("salt", &format_args!("<{} bytes>", self.salt.len()))
            .finish()
    }
}

/// Password hashing implementation.
///
/// Computes HMAC-SHA-512 over the UTF-8 password, keyed by a random per-identity secret.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a freshly generated secret.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Digest holding the 64-byte hash and the 128-byte secret used as HMAC key
    ///
    /// # Errors
    /// * `HashingFailed` - HMAC could not be keyed
    pub fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordError> {
        let mut salt = vec![0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        let hash = Self::keyed_hash(password, &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .finalize()
            .into_bytes()
            .to_vec();

        Ok(PasswordDigest { hash, salt })
    }

    /// Verify a password against a stored hash and secret.
    ///
    /// The comparison runs in constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored 64-byte hash
    /// * `salt` - Stored secret the hash was keyed with
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedDigest` - Stored hash or secret has the wrong shape
    pub fn verify(&self, password: &str, hash: &[u8], salt: &[u8]) -> Result<bool, PasswordError> {
        if salt.is_empty() {
            return Err(PasswordError::MalformedDigest(
                "password salt is empty".to_string(),
            ));
        }
        if hash.len() != HASH_LENGTH {
            return Err(PasswordError::MalformedDigest(format!(
                "password hash must be {} bytes, got {}",
                HASH_LENGTH,
                hash.len()
            )));
        }

        let mac = Self::keyed_hash(password, salt)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?;

        Ok(mac.verify_slice(hash).is_ok())
    }

    fn keyed_hash(password: &str, key: &[u8]) -> Result<HmacSha512, hmac::digest::InvalidLength> {
        let mut mac = HmacSha512::new_from_slice(key)?;
        mac.update(password.as_bytes());
        Ok(mac)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
