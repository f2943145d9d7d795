//! Core document model, code tables, validation, and key derivation.
//!
//! This module provides the Hacienda v4.2 document tree, the declarative
//! field rules every entity is checked against, and the ordered node tree
//! every serializer renders from.

mod builder;
pub mod codes;
mod document;
mod error;
mod format;
mod serialize;
mod summary;
mod tree;
mod types;
mod validation;

pub use builder::*;
pub use codes::CodeTable;
pub use document::*;
pub use error::*;
pub use format::{format_decimal, format_timestamp};
pub use tree::*;
pub use types::*;
pub use validation::*;
