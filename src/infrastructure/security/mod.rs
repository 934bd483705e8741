mod argon2_hasher;
mod token_issuer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use token_issuer::RandomTokenIssuer;
