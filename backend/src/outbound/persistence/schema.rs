//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes the schema, regenerate this file with `diesel print-schema` or edit
//! it by hand.

diesel::table! {
    /// Registered authors and their credentials.
    authors (id) {
        id -> Int8,
        /// Unique login name (max 150 characters).
        username -> Varchar,
        /// Argon2 PHC string; never leaves the persistence layer.
        password_hash -> Text,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per author, created alongside the account.
    profiles (author_id) {
        author_id -> Int8,
        bio -> Nullable<Varchar>,
        avatar -> Varchar,
    }
}

diesel::table! {
    /// Blog posts.
    posts (id) {
        id -> Int8,
        author_id -> Int8,
        title -> Varchar,
        content -> Text,
        image -> Varchar,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Comments attached to posts.
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Int8,
        text -> Varchar,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Live API token per author. Only the SHA-256 digest is stored.
    auth_tokens (author_id) {
        author_id -> Int8,
        digest -> Varchar,
        created -> Timestamptz,
    }
}

diesel::joinable!(profiles -> authors (author_id));
diesel::joinable!(posts -> authors (author_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(auth_tokens -> authors (author_id));

diesel::allow_tables_to_appear_in_same_query!(authors, profiles, posts, comments, auth_tokens);
