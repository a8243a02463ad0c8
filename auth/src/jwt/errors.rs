use thiserror::Error;

/// Failures while issuing or checking a session token.
///
/// Every variant other than `EncodingFailed` means the presented token must be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Signing failed; the key or claims could not be serialized.
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Not a well-formed HS256 token.
    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    /// Bad signature, or issuer/audience other than the configured ones.
    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
