//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local repositories for tests and database-less runs
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: bcrypt password hashing and JWT session tokens
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
