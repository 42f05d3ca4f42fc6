// Library exports for the shuttle-coach CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
