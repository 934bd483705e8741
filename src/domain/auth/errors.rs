use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::value_objects::IdentityField;

/// Stable classification of an `AuthError`.
///
/// Callers branch on this instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  Validation,
  Conflict,
  BadCredentials,
  System,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Validation => write!(f, "validation"),
      Self::Conflict => write!(f, "conflict"),
      Self::BadCredentials => write!(f, "bad_credentials"),
      Self::System => write!(f, "system"),
    }
  }
}

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Username already taken")]
  UsernameTaken,

  #[error("Email already taken")]
  EmailTaken,

  #[error("Email/password wrong combination")]
  BadCredentials,

  #[error("{operation} failed")]
  System {
    operation: &'static str,
    #[source]
    source: SystemError,
  },
}

impl AuthError {
  /// Wraps a collaborator failure with the name of the operation that hit it
  pub fn system(operation: &'static str, source: impl Into<SystemError>) -> Self {
    Self::System {
      operation,
      source: source.into(),
    }
  }

  /// Maps a uniqueness violation on the given field to its "taken" error
  pub fn taken(field: IdentityField) -> Self {
    match field {
      IdentityField::Username => Self::UsernameTaken,
      IdentityField::Email => Self::EmailTaken,
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Validation,
      Self::UsernameTaken | Self::EmailTaken => ErrorKind::Conflict,
      Self::BadCredentials => ErrorKind::BadCredentials,
      Self::System { .. } => ErrorKind::System,
    }
  }

  /// Message safe to show to the end user.
  ///
  /// System failures collapse to a generic text; their cause stays
  /// available through `std::error::Error::source` for diagnostics.
  pub fn public_message(&self) -> String {
    match self {
      Self::System { .. } => "Internal server error".to_string(),
      other => other.to_string(),
    }
  }
}

/// Collaborator failures unrelated to business rules
#[derive(Debug, Error)]
pub enum SystemError {
  #[error(transparent)]
  Repository(#[from] RepositoryError),

  #[error(transparent)]
  Hash(#[from] HashError),

  #[error(transparent)]
  Credential(#[from] CredentialError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Store call exceeded its deadline")]
  Timeout,

  #[error("Unique constraint violated on {0}")]
  Conflict(IdentityField),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Invalid hashing parameters: {0}")]
  InvalidParams(String),

  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Hashing task aborted: {0}")]
  TaskFailed(String),
}

/// Access credential issuance errors
#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("Failed to issue access token: {0}")]
  IssuanceFailed(String),
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Username not long enough, {min} characters at least")]
  UsernameTooShort { min: usize },

  #[error("Invalid email address")]
  InvalidEmail,

  #[error("Password not long enough, {min} characters at least")]
  PasswordTooShort { min: usize },

  #[error("Password required")]
  PasswordRequired,

  #[error("Confirm password must match the password")]
  PasswordMismatch,
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => RepositoryError::Conflict(IdentityField::Username),
            Some(EMAIL_CONSTRAINT) => RepositoryError::Conflict(IdentityField::Email),
            _ => RepositoryError::DatabaseError(db_err.message().to_string()),
          }
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      sqlx::Error::Io(e) => RepositoryError::ConnectionFailed(e.to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

/// Unique constraint names declared by the `users` migration
pub const USERNAME_CONSTRAINT: &str = "users_username_key";
pub const EMAIL_CONSTRAINT: &str = "users_email_key";
