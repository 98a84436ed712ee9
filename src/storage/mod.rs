//! Storage for the mock API

pub mod in_memory;

pub use in_memory::{InMemoryStore, Record};
