use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::{NewUser, User},
  errors::RepositoryError,
  ports::UserRepository,
  value_objects::IdentityField,
};

/// Number of times each repository operation has been invoked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryCalls {
  pub create: usize,
  pub find_by_username: usize,
  pub find_by_email: usize,
}

impl RepositoryCalls {
  pub fn total(&self) -> usize {
    self.create + self.find_by_username + self.find_by_email
  }
}

/// Process-local user store.
///
/// Enforces the same username/email uniqueness as the SQL schema and
/// counts every call so callers can assert on store interaction.
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<Vec<User>>,
  create_calls: AtomicUsize,
  find_by_username_calls: AtomicUsize,
  find_by_email_calls: AtomicUsize,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a repository pre-seeded with the given users
  pub fn with_users(users: Vec<User>) -> Self {
    Self {
      users: RwLock::new(users),
      ..Self::default()
    }
  }

  pub fn calls(&self) -> RepositoryCalls {
    RepositoryCalls {
      create: self.create_calls.load(Ordering::SeqCst),
      find_by_username: self.find_by_username_calls.load(Ordering::SeqCst),
      find_by_email: self.find_by_email_calls.load(Ordering::SeqCst),
    }
  }

  pub async fn len(&self) -> usize {
    self.users.read().await.len()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
    self.create_calls.fetch_add(1, Ordering::SeqCst);

    let mut users = self.users.write().await;

    if users.iter().any(|u| u.username == user.username) {
      return Err(RepositoryError::Conflict(IdentityField::Username));
    }
    if users.iter().any(|u| u.email == user.email) {
      return Err(RepositoryError::Conflict(IdentityField::Email));
    }

    let created = User::from_new(user);
    users.push(created.clone());

    tracing::debug!(user_id = %created.id, "stored user in memory");
    Ok(created)
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
    self.find_by_username_calls.fetch_add(1, Ordering::SeqCst);

    let users = self.users.read().await;
    Ok(users.iter().find(|u| u.username == username).cloned())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
    self.find_by_email_calls.fetch_add(1, Ordering::SeqCst);

    let users = self.users.read().await;
    Ok(users.iter().find(|u| u.email == email).cloned())
  }
}
