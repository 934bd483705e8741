use serde::{Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Plaintext password held only for the duration of a hash or verify call.
///
/// The buffer is wiped on drop and never rendered by `Debug` or `Display`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub fn new(password: impl Into<String>) -> Self {
    Self(password.into())
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn as_bytes(&self) -> &[u8] {
    self.0.as_bytes()
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (PHC string as stored)
// ============================================================================

/// Opaque password digest as persisted by the store.
///
/// The domain never inspects the format; only the hasher does.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps a digest read back from storage or produced by a hasher
  pub fn from_stored(hash: impl Into<String>) -> Self {
    Self(hash.into())
  }

  /// A hash no password verifies against.
  ///
  /// Verifying against it costs the same as verifying against a real hash.
  pub fn unusable() -> Self {
    Self(String::new())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(***)")
  }
}

// ============================================================================
// AccessToken Value Object (opaque bearer credential)
// ============================================================================

/// Bearer credential minted by a `CredentialIssuer`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  /// Returns the token as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("AccessToken(***)")
  }
}

impl Serialize for AccessToken {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

// ============================================================================
// IdentityField Enum
// ============================================================================

/// The user attributes that must be unique across all users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
  Username,
  Email,
}

impl fmt::Display for IdentityField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Username => write!(f, "username"),
      Self::Email => write!(f, "email"),
    }
  }
}
