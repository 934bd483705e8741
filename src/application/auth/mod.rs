//! Authentication use cases
//!
//! Thin wrappers over `AuthService` that turn an `AuthenticationResult`
//! into a response safe to hand to any transport layer.

mod login_user;
mod register_user;

pub use login_user::{LoginUserResponse, LoginUserUseCase};
pub use register_user::{RegisterUserResponse, RegisterUserUseCase};
