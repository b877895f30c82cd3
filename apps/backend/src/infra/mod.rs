//! Infrastructure layer: database wiring, storage implementations, and state assembly.

pub mod db;
pub mod db_errors;
pub mod memory_store;
pub mod sea_store;
pub mod state;

pub use memory_store::MemoryStore;
pub use sea_store::SeaStore;
