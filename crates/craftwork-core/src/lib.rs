//! # Craftwork Core
//!
//! Crafting systems for Craftwork.
//!
//! This crate provides the synchronous crafting core:
//! - Items and kind equivalence
//! - Inventory contract and slot-based inventory
//! - Recipes (availability, consumption, production, craft)
//! - Non-item costs (health, stamina, magic, gold)
//! - Ground drops for overflow
//! - Actor-driven crafting and the player
//! - Event bus for crafting notifications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cost;
pub mod crafting;
pub mod economy;
pub mod events;
pub mod inventory;
pub mod item;
pub mod player;
pub mod policy;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cost::*;
    pub use crate::crafting::*;
    pub use crate::economy::*;
    pub use crate::events::*;
    pub use crate::inventory::*;
    pub use crate::item::*;
    pub use crate::player::*;
    pub use crate::policy::*;
    pub use crate::world::*;
}

pub use prelude::*;
