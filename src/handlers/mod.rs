//! HTTP handlers for search, entries, categories and votes.

pub mod category;
pub mod tools;
pub mod vote;
pub use category::*;
pub use tools::*;
pub use vote::*;
