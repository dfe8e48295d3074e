//! CLI command implementations.

pub mod backup;
pub mod event;
pub mod settings;
pub mod summary;
pub mod trip;
