//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: mutex-guarded store for development and tests
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **security**: Argon2 password hashing
//!
//! Adapters only translate between domain types and infrastructure
//! representations.

pub mod memory;
pub mod persistence;
pub mod security;
