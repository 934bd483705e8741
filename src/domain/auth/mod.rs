pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod validation;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{NewUser, User};
pub use errors::{
  AuthError, CredentialError, ErrorKind, HashError, RepositoryError, SystemError, ValidationError,
};
pub use ports::{CredentialIssuer, PasswordHasher, UserRepository};
pub use services::{AuthService, AuthServiceConfig, AuthenticationResult};
pub use validation::{LoginInput, RegistrationInput};
pub use value_objects::{AccessToken, IdentityField, Password, PasswordHash};
