use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::PasswordHash;

/// User entity representing a registered identity
#[derive(Debug, Clone, Serialize)]
pub struct User {
  /// Unique identifier for the user, assigned by the store
  pub id: Uuid,
  /// Login handle (unique)
  pub username: String,
  /// Lowercase email address (unique)
  pub email: String,
  /// Argon2 digest of the password, never the plaintext
  #[serde(skip_serializing)]
  pub password_hash: PasswordHash,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Materialises a new user record, stamping identifier and timestamps.
  ///
  /// Stores that cannot generate identifiers themselves use this when
  /// persisting a `NewUser`.
  pub fn from_new(new_user: NewUser) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      username: new_user.username,
      email: new_user.email,
      password_hash: new_user.password_hash,
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      username,
      email,
      password_hash: PasswordHash::from_stored(password_hash),
      created_at,
      updated_at,
    }
  }
}

/// A user that has passed validation and hashing but is not yet persisted
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub email: String,
  pub password_hash: PasswordHash,
}

impl NewUser {
  pub fn new(username: String, email: String, password_hash: PasswordHash) -> Self {
    Self {
      username,
      email,
      password_hash,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_user() -> NewUser {
    NewUser::new(
      "bob".to_string(),
      "bob@example.com".to_string(),
      PasswordHash::from_stored("$argon2id$stub"),
    )
  }

  #[test]
  fn test_user_from_new_stamps_identity() {
    let user = User::from_new(new_user());

    assert!(!user.id.is_nil());
    assert_eq!(user.username, "bob");
    assert_eq!(user.email, "bob@example.com");
    assert_eq!(user.created_at, user.updated_at);
  }

  #[test]
  fn test_user_from_new_generates_distinct_ids() {
    let first = User::from_new(new_user());
    let second = User::from_new(new_user());

    assert_ne!(first.id, second.id);
  }

  #[test]
  fn test_serialized_user_omits_password_hash() {
    let user = User::from_new(new_user());
    let json = serde_json::to_value(&user).unwrap();

    assert!(json.get("password_hash").is_none());
    assert_eq!(json["username"], "bob");
    assert_eq!(json["email"], "bob@example.com");
  }
}
