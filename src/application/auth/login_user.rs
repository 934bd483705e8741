use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::validation::LoginInput;

/// Response after successful user login
#[derive(Debug, Clone, Serialize)]
pub struct LoginUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  pub username: String,
  pub email: String,
  /// Access token for authentication
  pub access_token: String,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Errors
  /// Returns `AuthError` if login fails (validation, bad credentials, or a
  /// system failure)
  pub async fn execute(&self, input: LoginInput) -> Result<LoginUserResponse, AuthError> {
    let result = self.auth_service.login(input).await?;
    let user = result.user;

    Ok(LoginUserResponse {
      user_id: user.id,
      username: user.username,
      email: user.email,
      access_token: result.access_token.into_inner(),
    })
  }
}
