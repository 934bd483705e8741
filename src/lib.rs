//! Registration and login core.
//!
//! `domain::auth::AuthService` runs the two workflows on top of three ports:
//! a user store, a password hasher and a credential issuer. The
//! `infrastructure` module provides Postgres, in-memory, Argon2id and random
//! token implementations; `application` wraps the workflows in use cases
//! that return serialisable responses.

pub mod application;
pub mod domain;
pub mod infrastructure;
