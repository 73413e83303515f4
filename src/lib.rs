//! Library crate for pokedex-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - The fixed Pokemon catalog (`catalog`)
//! - The per-owner binary search tree and traversal orders (`pokedex`)
//! - The circular owner registry (`registry`)
//! - Application state, menu operations and update loop (`app`)
//! - Error and result types (`error`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `pokedex-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod catalog;
pub mod error;
pub mod pokedex;
pub mod registry;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, PokedexError, Result};
pub use pokedex::{DisplayOrder, PokedexTree, TraversalOrder};
pub use registry::{Direction, Owner, OwnerId, OwnerRegistry};
