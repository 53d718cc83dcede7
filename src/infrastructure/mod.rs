//! Infrastructure layer: adapters for external systems

pub mod backend;
pub mod config;
