use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{NewUser, User},
  errors::RepositoryError,
  ports::UserRepository,
};

/// PostgreSQL implementation of the UserRepository trait
///
/// Inserts go to the writer pool and lookups to the reader pool, which may
/// point at a replica. Uniqueness is enforced by the `users_username_key`
/// and `users_email_key` constraints.
pub struct PostgresUserRepository {
  writer: PgPool,
  reader: PgPool,
}

impl PostgresUserRepository {
  /// Creates a repository that uses a single pool for reads and writes
  pub fn new(pool: PgPool) -> Self {
    Self {
      writer: pool.clone(),
      reader: pool,
    }
  }

  /// Creates a repository with separate writer and reader pools
  pub fn with_pools(writer: PgPool, reader: PgPool) -> Self {
    Self { writer, reader }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  username: String,
  email: String,
  password_hash: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      row.id,
      row.username,
      row.email,
      row.password_hash,
      row.created_at,
      row.updated_at,
    )
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(user.password_hash.as_str())
    .fetch_one(&self.writer)
    .await;

    match result {
      Ok(row) => {
        tracing::debug!(user_id = %row.id, "inserted user");
        Ok(row.into())
      }
      Err(e) => {
        let err = RepositoryError::from(e);
        if !matches!(err, RepositoryError::Conflict(_)) {
          tracing::error!(error = %err, "failed to insert user");
        }
        Err(err)
      }
    }
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
    )
    .bind(username)
    .fetch_optional(&self.reader)
    .await;

    match result {
      Ok(row) => Ok(row.map(User::from)),
      Err(e) => {
        tracing::error!(error = %e, "failed to look up user by username");
        Err(e.into())
      }
    }
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email)
    .fetch_optional(&self.reader)
    .await;

    match result {
      Ok(row) => Ok(row.map(User::from)),
      Err(e) => {
        tracing::error!(error = %e, "failed to look up user by email");
        Err(e.into())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::{IdentityField, PasswordHash};
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    // Start a PostgreSQL container
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  fn new_user(username: &str, email: &str) -> NewUser {
    NewUser::new(
      username.to_string(),
      email.to_string(),
      PasswordHash::from_stored("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g"),
    )
  }

  #[tokio::test]
  async fn test_create_user_assigns_identity() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let created = repo.create(new_user("bob", "bob@example.com")).await.unwrap();

    assert!(!created.id.is_nil());
    assert_eq!(created.username, "bob");
    assert_eq!(created.email, "bob@example.com");
    assert!(created.password_hash.as_str().starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn test_find_by_username_and_email() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::with_pools(pool.clone(), pool);

    let created = repo.create(new_user("bob", "bob@example.com")).await.unwrap();

    let by_username = repo.find_by_username("bob").await.unwrap().unwrap();
    let by_email = repo.find_by_email("bob@example.com").await.unwrap().unwrap();
    assert_eq!(by_username.id, created.id);
    assert_eq!(by_email.id, created.id);

    assert!(repo.find_by_username("alice").await.unwrap().is_none());
    assert!(repo.find_by_email("alice@example.com").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_duplicate_username() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(new_user("bob", "bob@example.com")).await.unwrap();
    let result = repo.create(new_user("bob", "other@example.com")).await;

    match result {
      Err(RepositoryError::Conflict(IdentityField::Username)) => {}
      other => panic!("Expected username conflict, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_duplicate_email() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(new_user("bob", "bob@example.com")).await.unwrap();
    let result = repo.create(new_user("robert", "bob@example.com")).await;

    match result {
      Err(RepositoryError::Conflict(IdentityField::Email)) => {}
      other => panic!("Expected email conflict, got {:?}", other),
    }
  }
}
