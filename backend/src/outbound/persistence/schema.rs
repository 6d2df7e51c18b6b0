//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts table.
    ///
    /// The `id` column is the primary key (UUID v4); `email` is unique.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised email address.
        email -> Varchar,
        /// bcrypt digest of the account password.
        password_digest -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// To-do items owned by a single user.
    tasks (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Task description (max 255 characters).
        text -> Varchar,
        /// Client display ordering, never negative.
        task_order -> Int4,
        /// Completion flag.
        completed -> Bool,
        /// Owning user (foreign key to `users.id`).
        user_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, users);
