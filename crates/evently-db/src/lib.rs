//! Database layer for the Evently backend.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. Every table is created through versioned
//! migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: the event store is a single-writer,
//!   many-reader workload; WAL mode allows concurrent readers alongside the
//!   writer without an external database process.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management. The pool is constructed once at startup and passed
//!   in as an explicit handle, never held as ambient global state.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server and cannot drift
//!   from the code that depends on it.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
