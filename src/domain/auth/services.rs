use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use zeroize::Zeroize;

use super::entities::{NewUser, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{CredentialIssuer, PasswordHasher, UserRepository};
use super::validation::{LoginInput, RegistrationInput};
use super::value_objects::{AccessToken, Password, PasswordHash};

/// Default deadline for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Tunables for `AuthService`
#[derive(Debug, Clone, Copy)]
pub struct AuthServiceConfig {
  /// Upper bound on each repository call; exceeding it is a system error
  pub store_timeout: Duration,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      store_timeout: DEFAULT_STORE_TIMEOUT,
    }
  }
}

/// Outcome of a successful register or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationResult {
  pub access_token: AccessToken,
  pub user: User,
}

/// Authentication service implementing the register and login workflows.
///
/// Holds no mutable state of its own; every call is independent and the
/// service can be shared freely behind an `Arc`.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  credential_issuer: Arc<dyn CredentialIssuer>,
  config: AuthServiceConfig,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    credential_issuer: Arc<dyn CredentialIssuer>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      credential_issuer,
      config,
    }
  }

  /// Registers a new user and issues them an access token
  ///
  /// # Errors
  /// - `AuthError::Validation` if the input is malformed (the store is not touched)
  /// - `AuthError::UsernameTaken` / `AuthError::EmailTaken` if either identity
  ///   field is already in use, whether the lookup or the insert caught it
  /// - `AuthError::System` if the store, hasher or issuer fails
  #[tracing::instrument(name = "register", skip_all)]
  pub async fn register(
    &self,
    mut input: RegistrationInput,
  ) -> Result<AuthenticationResult, AuthError> {
    input.sanitize();
    input.validate()?;

    // Advisory pre-checks; the store's unique constraints are authoritative.
    let existing = self
      .with_deadline(self.user_repo.find_by_username(&input.username))
      .await
      .map_err(|e| AuthError::system("look up user by username", e))?;
    if existing.is_some() {
      return Err(AuthError::UsernameTaken);
    }

    let existing = self
      .with_deadline(self.user_repo.find_by_email(&input.email))
      .await
      .map_err(|e| AuthError::system("look up user by email", e))?;
    if existing.is_some() {
      return Err(AuthError::EmailTaken);
    }

    let password = Password::new(std::mem::take(&mut input.password));
    input.confirm_password.zeroize();

    let password_hash = self
      .password_hasher
      .hash(&password)
      .await
      .map_err(|e| AuthError::system("hash password", e))?;

    let new_user = NewUser::new(input.username, input.email, password_hash);

    let user = match self.with_deadline(self.user_repo.create(new_user)).await {
      Ok(user) => user,
      Err(RepositoryError::Conflict(field)) => return Err(AuthError::taken(field)),
      Err(e) => return Err(AuthError::system("create user", e)),
    };

    let access_token = self.issue_token(&user).await?;

    Ok(AuthenticationResult { access_token, user })
  }

  /// Authenticates a returning user by email and password
  ///
  /// # Errors
  /// - `AuthError::Validation` if the input is malformed (the store is not touched)
  /// - `AuthError::BadCredentials` if the email is unknown or the password is
  ///   wrong; the two cases are indistinguishable
  /// - `AuthError::System` if the store, hasher or issuer fails
  #[tracing::instrument(name = "login", skip_all)]
  pub async fn login(&self, mut input: LoginInput) -> Result<AuthenticationResult, AuthError> {
    input.sanitize();
    input.validate()?;

    let password = Password::new(std::mem::take(&mut input.password));

    let user = self
      .with_deadline(self.user_repo.find_by_email(&input.email))
      .await
      .map_err(|e| AuthError::system("look up user by email", e))?;

    let Some(user) = user else {
      // Spend the same hashing work as a wrong password would.
      let _ = self
        .password_hasher
        .verify(&password, &PasswordHash::unusable())
        .await;
      return Err(AuthError::BadCredentials);
    };

    let matches = self
      .password_hasher
      .verify(&password, &user.password_hash)
      .await
      .map_err(|e| AuthError::system("verify password", e))?;
    if !matches {
      return Err(AuthError::BadCredentials);
    }

    let access_token = self.issue_token(&user).await?;

    Ok(AuthenticationResult { access_token, user })
  }

  async fn issue_token(&self, user: &User) -> Result<AccessToken, AuthError> {
    self
      .credential_issuer
      .issue(user)
      .await
      .map_err(|e| AuthError::system("issue access token", e))
  }

  /// Runs a store call under the configured deadline.
  ///
  /// Dropping the timed-out future cancels the in-flight call.
  async fn with_deadline<T>(
    &self,
    call: impl Future<Output = Result<T, RepositoryError>>,
  ) -> Result<T, RepositoryError> {
    tokio::time::timeout(self.config.store_timeout, call)
      .await
      .unwrap_or(Err(RepositoryError::Timeout))
  }
}
