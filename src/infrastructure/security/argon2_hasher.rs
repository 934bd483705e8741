use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;
use rand::RngCore;

use crate::domain::auth::errors::HashError;
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};
use crate::infrastructure::config::HashingConfig;

/// Argon2id password hasher implementation
///
/// The work factor comes from `HashingConfig`. Production defaults follow
/// the OWASP minimum for Argon2id:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 lane
///
/// Hashing and verification run on the blocking thread pool so they never
/// stall the async runtime.
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
  /// Digest of random bytes, verified against in place of malformed hashes
  dummy_hash: String,
}

impl Argon2PasswordHasher {
  /// Creates a hasher with the configured work factor
  pub fn new(config: &HashingConfig) -> Result<Self, HashError> {
    Self::with_params(config.memory_kib, config.iterations, config.parallelism)
  }

  /// Creates a hasher with explicit Argon2id parameters
  pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, HashError> {
    // Output length: 32 bytes
    let params = Params::new(memory_kib, iterations, parallelism, Some(32))
      .map_err(|e| HashError::InvalidParams(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut filler = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut filler);
    let dummy_hash = hash_bytes(&argon2, &filler)?;

    Ok(Self { argon2, dummy_hash })
  }
}

fn hash_bytes(argon2: &Argon2<'_>, bytes: &[u8]) -> Result<String, HashError> {
  let salt = SaltString::generate(&mut rand::rngs::OsRng);

  argon2
    .hash_password(bytes, &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| HashError::HashingFailed(e.to_string()))
}

/// Parses a stored digest, keeping it only if this hasher can really check it
fn checkable_target(stored: &str) -> Option<Argon2PasswordHash<'_>> {
  Argon2PasswordHash::new(stored)
    .ok()
    .filter(|parsed| {
      parsed.algorithm == argon2::ARGON2ID_IDENT && parsed.salt.is_some() && parsed.hash.is_some()
    })
}

/// Spends one full verification against the dummy digest
fn verify_dummy(argon2: &Argon2<'_>, password: &Password, dummy: &str) {
  if let Ok(target) = Argon2PasswordHash::new(dummy) {
    let _ = argon2.verify_password(password.as_bytes(), &target);
  }
}

fn verify_or_dummy(argon2: &Argon2<'_>, password: &Password, stored: &str, dummy: &str) -> bool {
  let Some(target) = checkable_target(stored) else {
    verify_dummy(argon2, password, dummy);
    return false;
  };

  // verify_password compares digests in constant time
  match argon2.verify_password(password.as_bytes(), &target) {
    Ok(()) => true,
    Err(argon2::password_hash::Error::Password) => false,
    Err(e) => {
      tracing::warn!(error = %e, "stored password hash could not be checked");
      verify_dummy(argon2, password, dummy);
      false
    }
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let hash = tokio::task::spawn_blocking(move || hash_bytes(&argon2, password.as_bytes()))
      .await
      .map_err(|e| HashError::TaskFailed(e.to_string()))??;

    Ok(PasswordHash::from_stored(hash))
  }

  async fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, HashError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let stored = hash.as_str().to_owned();
    let dummy = self.dummy_hash.clone();

    tokio::task::spawn_blocking(move || verify_or_dummy(&argon2, &password, &stored, &dummy))
      .await
      .map_err(|e| HashError::TaskFailed(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const NO_DIGEST_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ";
  const FOREIGN_ALGORITHM_HASH: &str = "$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$aGFzaGhhc2g";

  fn hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_params(8, 1, 1).unwrap()
  }

  #[tokio::test]
  async fn test_hash_password() {
    let password = Password::new("test_password_123");

    let hash = hasher().hash(&password).await.unwrap();

    assert!(hash.as_str().starts_with("$argon2id$"));
    assert!(!hash.as_str().contains("test_password_123"));
  }

  #[tokio::test]
  async fn test_verify_correct_password() {
    let hasher = hasher();
    let password = Password::new("test_password_123");

    let hash = hasher.hash(&password).await.unwrap();

    assert!(hasher.verify(&password, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_verify_incorrect_password() {
    let hasher = hasher();
    let hash = hasher.hash(&Password::new("test_password_123")).await.unwrap();

    for wrong in ["wrong_password", "test_password_12", "test_password_1234", ""] {
      assert!(!hasher.verify(&Password::new(wrong), &hash).await.unwrap());
    }
  }

  #[tokio::test]
  async fn test_hash_produces_different_salts() {
    let hasher = hasher();
    let password = Password::new("test_password_123");

    let hash1 = hasher.hash(&password).await.unwrap();
    let hash2 = hasher.hash(&password).await.unwrap();

    // Same password should produce different hashes due to random salt
    assert_ne!(hash1.as_str(), hash2.as_str());

    assert!(hasher.verify(&password, &hash1).await.unwrap());
    assert!(hasher.verify(&password, &hash2).await.unwrap());
  }

  #[tokio::test]
  async fn test_verify_malformed_hash_is_false() {
    let hasher = hasher();
    let password = Password::new("test_password_123");

    for stored in ["", "invalid_hash", "$argon2id$v=19$garbage"] {
      let result = hasher
        .verify(&password, &PasswordHash::from_stored(stored))
        .await;
      assert!(!result.unwrap());
    }
  }

  #[tokio::test]
  async fn test_verify_parsable_but_uncheckable_hash_is_false() {
    let hasher = hasher();
    let password = Password::new("test_password_123");

    for stored in [NO_DIGEST_HASH, FOREIGN_ALGORITHM_HASH] {
      let result = hasher
        .verify(&password, &PasswordHash::from_stored(stored))
        .await;
      assert!(!result.unwrap());
    }
  }

  #[tokio::test]
  async fn test_uncheckable_hashes_fall_back_to_dummy() {
    let real = hasher().hash(&Password::new("test_password_123")).await.unwrap();

    assert!(checkable_target(real.as_str()).is_some());
    for stored in ["", "garbage", NO_DIGEST_HASH, FOREIGN_ALGORITHM_HASH] {
      assert!(checkable_target(stored).is_none(), "{stored} should use the dummy");
    }
  }

  #[test]
  fn test_malformed_hash_costs_as_much_as_wrong_password() {
    let hasher = Argon2PasswordHasher::with_params(4096, 3, 1).unwrap();
    let password = Password::new("test_password_123");
    let real = hash_bytes(&hasher.argon2, b"another_password").unwrap();

    let fastest = |stored: &str| {
      (0..3)
        .map(|_| {
          let started = std::time::Instant::now();
          assert!(!verify_or_dummy(&hasher.argon2, &password, stored, &hasher.dummy_hash));
          started.elapsed()
        })
        .min()
        .unwrap()
    };

    let wrong_password = fastest(&real);
    for stored in ["garbage", NO_DIGEST_HASH, FOREIGN_ALGORITHM_HASH] {
      let elapsed = fastest(stored);
      assert!(
        elapsed * 4 >= wrong_password,
        "{stored} took {elapsed:?}, wrong password took {wrong_password:?}"
      );
    }
  }

  #[tokio::test]
  async fn test_unusable_hash_never_verifies() {
    let hasher = hasher();

    let result = hasher
      .verify(&Password::new(""), &PasswordHash::unusable())
      .await;

    assert!(!result.unwrap());
  }

  #[tokio::test]
  async fn test_argon2_parameters() {
    let hasher = Argon2PasswordHasher::new(&HashingConfig {
      memory_kib: 64,
      iterations: 2,
      parallelism: 1,
    })
    .unwrap();

    let hash = hasher.hash(&Password::new("test_password_123")).await.unwrap();
    let parsed = Argon2PasswordHash::new(hash.as_str()).unwrap();

    assert_eq!(parsed.algorithm.as_str(), "argon2id");
    assert_eq!(parsed.version, Some(Version::V0x13 as u32));
    assert_eq!(parsed.params.get_decimal("m"), Some(64));
    assert_eq!(parsed.params.get_decimal("t"), Some(2));
  }

  #[test]
  fn test_invalid_params_rejected() {
    let result = Argon2PasswordHasher::with_params(0, 0, 0);

    assert!(matches!(result, Err(HashError::InvalidParams(_))));
  }
}
