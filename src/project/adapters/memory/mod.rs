//! In-memory project adapters.

mod project;

pub use project::InMemoryProjectRepository;
