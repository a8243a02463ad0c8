use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::store::Mutation;
use crate::domain::store::MutationOutcome;
use crate::domain::store::StoreFailure;
use crate::domain::store::TransactionalStore;

/// Domain service for registration and login.
///
/// Holds no per-request state; the authenticator carries the process-wide signing settings.
pub struct IdentityService<IR, S>
where
    IR: IdentityRepository,
    S: TransactionalStore<Identity>,
{
    repository: Arc<IR>,
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
}

impl<IR, S> IdentityService<IR, S>
where
    IR: IdentityRepository,
    S: TransactionalStore<Identity>,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity lookups
    /// * `store` - Transactional writes
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<IR>, store: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<IR, S> IdentityServicePort for IdentityService<IR, S>
where
    IR: IdentityRepository,
    S: TransactionalStore<Identity>,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError> {
        // Advisory check; the unique index on username settles concurrent registrations.
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(IdentityError::DuplicateIdentity(command.username.to_string()));
        }

        let password = self
            .authenticator
            .hash_password(command.password.expose())?;
        let username = command.username;

        let draft = NewIdentity {
            username: username.clone(),
            password,
        };

        match self.store.mutate(Mutation::Insert(draft)).await {
            Ok(MutationOutcome::Committed(identity)) => {
                tracing::info!(
                    identity_id = %identity.id,
                    username = %identity.username,
                    "Identity registered"
                );
                Ok(identity)
            }
            Ok(MutationOutcome::NoEffect) => {
                tracing::warn!(username = %username, "Identity insert committed without effect");
                Err(IdentityError::RegistrationFailed)
            }
            Err(StoreFailure::Conflict(detail)) => {
                tracing::debug!(username = %username, %detail, "Username taken concurrently");
                Err(IdentityError::DuplicateIdentity(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, IdentityError> {
        let identity = match Username::new(command.username) {
            Ok(username) => self.repository.find_by_username(&username).await?,
            Err(_) => None,
        };
        let Some(identity) = identity else {
            let rejection = self.authenticator.reject(&command.password);
            tracing::debug!(reason = %rejection, "Login for unknown username");
            return Err(IdentityError::InvalidCredentials);
        };

        let claims = self
            .authenticator
            .claims_for(identity.id, identity.username.as_str());

        let result = self
            .authenticator
            .authenticate(&command.password, &identity.password, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => IdentityError::InvalidCredentials,
                AuthenticationError::PasswordError(err) => IdentityError::Password(err),
                AuthenticationError::JwtError(err) => IdentityError::Token(err),
            })?;

        tracing::info!(identity_id = %identity.id, "Session issued");

        Ok(Session {
            identity_id: identity.id,
            username: identity.username,
            token: result.access_token,
        })
    }
}
