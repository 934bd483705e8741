//! Application layer
//!
//! Use cases that drive the domain workflows and shape their results for
//! the surrounding service layer.

pub mod auth;
