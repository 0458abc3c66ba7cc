//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` connection pool.
//!
//! - Repositories only translate between row structs and domain types; no
//!   business rules live here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Every database failure is mapped to the owning port's error enum.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod diesel_auth_token_repository;
mod diesel_author_repository;
mod diesel_comment_repository;
mod diesel_post_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_author_repository::DieselAuthorRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
