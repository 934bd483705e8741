//! Sanitation and validation of raw registration and login input.
//!
//! Both input types follow the same lifecycle: the caller builds them,
//! `sanitize` normalises them in place, `validate` checks them without I/O,
//! and they are dropped once the service has produced a result.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

use super::errors::ValidationError;

pub const USERNAME_MIN_LENGTH: usize = 2;
pub const PASSWORD_MIN_LENGTH: usize = 6;

lazy_static! {
  static ref EMAIL_REGEX: Regex = Regex::new(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
  )
  .expect("email pattern compiles");
}

fn is_valid_email(email: &str) -> bool {
  EMAIL_REGEX.is_match(email)
}

fn normalize_email(email: &mut String) {
  *email = email.trim().to_lowercase();
}

fn normalize_username(username: &mut String) {
  let trimmed = username.trim();
  if trimmed.len() != username.len() {
    *username = trimmed.to_string();
  }
}

/// Raw sign-up form
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationInput {
  pub email: String,
  pub username: String,
  pub password: String,
  pub confirm_password: String,
}

impl RegistrationInput {
  pub fn new(
    email: impl Into<String>,
    username: impl Into<String>,
    password: impl Into<String>,
    confirm_password: impl Into<String>,
  ) -> Self {
    Self {
      email: email.into(),
      username: username.into(),
      password: password.into(),
      confirm_password: confirm_password.into(),
    }
  }

  /// Trims email and username and lowercases the email. Idempotent.
  pub fn sanitize(&mut self) {
    normalize_email(&mut self.email);
    normalize_username(&mut self.username);
  }

  /// Returns the first rule the input breaks, checked in a fixed order:
  /// username length, email shape, password length, confirmation match.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.username.chars().count() < USERNAME_MIN_LENGTH {
      return Err(ValidationError::UsernameTooShort {
        min: USERNAME_MIN_LENGTH,
      });
    }

    if !is_valid_email(&self.email) {
      return Err(ValidationError::InvalidEmail);
    }

    if self.password.chars().count() < PASSWORD_MIN_LENGTH {
      return Err(ValidationError::PasswordTooShort {
        min: PASSWORD_MIN_LENGTH,
      });
    }

    if self.password != self.confirm_password {
      return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
  }
}

impl fmt::Debug for RegistrationInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RegistrationInput")
      .field("email", &self.email)
      .field("username", &self.username)
      .field("password", &"***")
      .field("confirm_password", &"***")
      .finish()
  }
}

/// Raw sign-in form
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginInput {
  pub email: String,
  pub password: String,
}

impl LoginInput {
  pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      email: email.into(),
      password: password.into(),
    }
  }

  /// Trims and lowercases the email. Idempotent.
  pub fn sanitize(&mut self) {
    normalize_email(&mut self.email);
  }

  pub fn validate(&self) -> Result<(), ValidationError> {
    if !is_valid_email(&self.email) {
      return Err(ValidationError::InvalidEmail);
    }

    if self.password.is_empty() {
      return Err(ValidationError::PasswordRequired);
    }

    Ok(())
  }
}

impl fmt::Debug for LoginInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoginInput")
      .field("email", &self.email)
      .field("password", &"***")
      .finish()
  }
}
