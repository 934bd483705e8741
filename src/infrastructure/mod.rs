//! Infrastructure layer
//!
//! Concrete adapters for the domain ports (password hashing, credential
//! issuance, user storage) plus configuration loading.

pub mod config;
pub mod persistence;
pub mod security;
