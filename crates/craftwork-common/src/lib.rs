//! # Craftwork Common
//!
//! Common types shared by the Craftwork crates.
//!
//! This crate provides foundational types used across the workspace:
//! - World coordinates (drop positions)
//! - ID types (EntityId, RecipeId)
//! - Schema versions for recipe and inventory files
//! - Top-level error type
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
