use async_trait::async_trait;

use super::entities::{NewUser, User};
use super::errors::{CredentialError, HashError, RepositoryError};
use super::value_objects::{AccessToken, Password, PasswordHash};

/// Repository trait for user persistence operations.
///
/// The store is the authority on uniqueness: `create` must reject a
/// duplicate username or email with `RepositoryError::Conflict` even when
/// the caller's lookups found nothing.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Persists a new user, assigning its identifier and timestamps
  async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

  /// Finds a user by their username
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

  /// Finds a user by their (lowercase) email address
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Produces a salted one-way digest of the password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError>;

  /// Checks a password against a stored digest.
  ///
  /// A malformed digest yields `Ok(false)` in the same time a wrong
  /// password would. `Err` is reserved for failures of the hasher itself.
  async fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, HashError>;
}

/// Mints the opaque bearer credential handed back after register/login
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
  async fn issue(&self, user: &User) -> Result<AccessToken, CredentialError>;
}
