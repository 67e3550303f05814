//! pagesdoc-ast - Block model
//!
//! This crate provides the intermediate representation handed from source
//! classification to the bundle serializer: an ordered sequence of
//! role-tagged text blocks.

pub mod block;
pub mod kind;

pub use block::{check_level, Block, Role, RoleError};
pub use kind::ErrorKind;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
