//! Craftwork CLI - recipe files, inventory snapshots and configuration.
//!
//! This crate wraps the crafting core with file formats and the commands
//! run by the `craftwork` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod commands;
pub mod config;
pub mod recipe_loader;
pub mod snapshot;
