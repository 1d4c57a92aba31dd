//! Project records that own tasks.
//!
//! Projects carry client and deadline metadata and act as the owner of every
//! task. The module follows the same hexagonal split as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
