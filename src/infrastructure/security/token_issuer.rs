use async_trait::async_trait;
use rand::RngCore;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::CredentialError;
use crate::domain::auth::ports::CredentialIssuer;
use crate::domain::auth::value_objects::AccessToken;

/// Issues random opaque bearer tokens.
///
/// Each token is 32 bytes from the operating system's CSPRNG, hex-encoded.
/// Binding the token to the user is left to whatever records it.
pub struct RandomTokenIssuer;

impl RandomTokenIssuer {
  const TOKEN_LENGTH: usize = 32; // 32 bytes = 256 bits

  pub fn new() -> Self {
    Self
  }
}

impl Default for RandomTokenIssuer {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl CredentialIssuer for RandomTokenIssuer {
  async fn issue(&self, user: &User) -> Result<AccessToken, CredentialError> {
    let mut token_bytes = [0u8; Self::TOKEN_LENGTH];
    rand::rngs::OsRng
      .try_fill_bytes(&mut token_bytes)
      .map_err(|e| CredentialError::IssuanceFailed(e.to_string()))?;

    tracing::debug!(user_id = %user.id, "issued access token");
    Ok(AccessToken::new(hex::encode(token_bytes)))
  }
}
