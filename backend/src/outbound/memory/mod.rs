//! In-memory repository adapters.
//!
//! Used when no database URL is configured and as deterministic stores in
//! behaviour tests. Each repository guards its map behind one mutex; the
//! guard never lives across an `.await`, and a poisoned lock surfaces as a
//! query error.

mod task_repository;
mod user_repository;

pub use task_repository::InMemoryTaskRepository;
pub use user_repository::InMemoryUserRepository;
