//! Worktrack: project and task tracking with work timers.
//!
//! This crate provides the core of a project manager in which each task
//! carries a status and an accumulated work time.
//!
//! # Architecture
//!
//! Worktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the store and issue transport
//! - **Adapters**: Concrete implementations of ports (in-memory store, etc.)
//!
//! Store and transport handles are constructed by the host and passed into
//! each service; there is no process-wide store.
//!
//! # Modules
//!
//! - [`project`]: Projects that own tasks
//! - [`task`]: Time tracking, status changes, and issue import
//! - [`config`]: Layered configuration

pub mod config;
pub mod project;
pub mod task;
