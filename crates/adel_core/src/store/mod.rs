//! Durable key-value storage used for small client-side flags.
//!
//! # Responsibility
//! - Define the storage contract consumed by stateful controllers.
//! - Keep SQLite details behind the `KeyValueStore` seam.
//!
//! # Invariants
//! - A missing key is `Ok(None)`, never an error.

pub mod kv_store;
