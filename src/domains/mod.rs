//! Domains module containing business logic organized by bounded contexts.
//!
//! The server exposes a single domain today: the Walmart catalog tools.

pub mod tools;
