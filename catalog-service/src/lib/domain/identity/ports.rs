use async_trait::async_trait;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::Username;
use crate::domain::store::StoreFailure;

/// Port for registration and login.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Created identity
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username is already taken
    /// * `RegistrationFailed` - Insert committed without effect
    /// * `Store` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `Store` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<Session, IdentityError>;
}

/// Read access to stored identities.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Retrieve identity by exact (case-sensitive) username.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `StoreFailure` - Database operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, StoreFailure>;
}
