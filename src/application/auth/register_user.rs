use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::validation::RegistrationInput;

/// Response after successful user registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserResponse {
  /// Unique identifier of the newly created user
  pub user_id: Uuid,
  pub username: String,
  pub email: String,
  /// Access token for immediate use
  pub access_token: String,
  pub created_at: DateTime<Utc>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if registration fails (validation, username or
  /// email taken, or a system failure)
  pub async fn execute(&self, input: RegistrationInput) -> Result<RegisterUserResponse, AuthError> {
    let result = self.auth_service.register(input).await?;
    let user = result.user;

    Ok(RegisterUserResponse {
      user_id: user.id,
      username: user.username,
      email: user.email,
      access_token: result.access_token.into_inner(),
      created_at: user.created_at,
    })
  }
}
