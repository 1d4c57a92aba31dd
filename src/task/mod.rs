//! Tasks, their work timers, and bulk import from an issue tracker.
//!
//! A task records a status and the work time accumulated over start/pause
//! cycles. Editing sessions keep a live, never-persisted work-time value
//! while a timer runs and fold it into the stored total on pause or save.
//! Open issues of an external repository can be imported as pending tasks.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Derived read-only figures in [`views`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod views;
