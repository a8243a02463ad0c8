use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::hmac_sha512::HASH_LENGTH;
use crate::password::hmac_sha512::SALT_LENGTH;
use crate::password::PasswordDigest;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Built once at startup from process-wide settings and shared read-only afterwards.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    expiration_hours: i64,
    decoy: PasswordDigest,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_handler` - Handler carrying the signing key, issuer and audience
    /// * `expiration_hours` - Lifetime of issued tokens
    pub fn new(jwt_handler: JwtHandler, expiration_hours: i64) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler,
            expiration_hours,
            decoy: PasswordDigest {
                hash: vec![0; HASH_LENGTH],
                salt: vec![0x5a; SALT_LENGTH],
            },
        }
    }

    /// Hash a password for storage with a fresh per-identity secret.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<PasswordDigest, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Build the session claims for an identity, issued now.
    pub fn claims_for(&self, identity_id: impl ToString, username: &str) -> Claims {
        let mut claims =
            Claims::for_identity(identity_id, username, Utc::now(), self.expiration_hours);
        if let Some(issuer) = self.jwt_handler.issuer() {
            claims = claims.with_issuer(issuer);
        }
        if let Some(audience) = self.jwt_handler.audience() {
            claims = claims.with_audience(audience);
        }
        claims
    }

    /// Verify credentials and generate a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `digest` - Stored hash and secret
    /// * `claims` - Claims to encode in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        digest: &PasswordDigest,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self
            .password_hasher
            .verify(password, &digest.hash, &digest.salt)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login that has no stored digest to check against.
    ///
    /// Runs the same keyed hash as `authenticate` so unknown usernames take as long
    /// as wrong passwords.
    pub fn reject(&self, password: &str) -> AuthenticationError {
        match self
            .password_hasher
            .verify(password, &self.decoy.hash, &self.decoy.salt)
        {
            Ok(_) => AuthenticationError::InvalidCredentials,
            Err(e) => e.into(),
        }
    }

    /// Validate and decode a token issued by this authenticator.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
