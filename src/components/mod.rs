//! Components - Headless Table Engine
//!
//! Pure view derivation; nothing here does I/O.

pub mod data_table;
