//! Trailmark — PostgreSQL store.
//!
//! Implements every repository trait over a connection pool. Queries are
//! runtime-checked (`sqlx::query_as` with `FromRow` rows), so the crate
//! builds without a live database.

pub mod pg;
mod rows;
pub mod schema;

pub use pg::PgStore;
