// ABOUTME: Library root for dockhand - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod daemon;
pub mod error;
pub mod manager;
pub mod model;
pub mod ssh;
pub mod types;
