//! SeaORM entity definitions for PostgreSQL database.

pub mod history_entry;
pub mod job;
