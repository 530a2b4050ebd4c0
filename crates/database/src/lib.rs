//! # MaxVariance Database Crate
//!
//! This crate is the system's source of truth for recorded sessions, plus the
//! in-memory cache the HTTP layer reads through.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all storage-specific logic behind the
//!   `SessionStore` trait. The rest of the application never sees SQL.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and Postgres
//!   access goes through a connection pool (`PgPool`).
//! - **Read Once, Compute Many:** `SessionCache` keeps the whole collection for a
//!   TTL so every stats endpoint shares a single store read.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: establish the pool and bring the schema up to date.
//! - `SessionStore`: fetch-all and write operations over sessions.
//! - `DbRepository`: the Postgres implementation.
//! - `MemoryStore`: an in-process implementation for offline use and tests.
//! - `SessionCache`: TTL cache in front of any store.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cache;
pub mod connection;
pub mod error;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use cache::SessionCache;
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, DbSession};
pub use store::{MemoryStore, SessionStore};
