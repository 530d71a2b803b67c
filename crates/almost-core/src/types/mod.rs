//! Type definitions shared across almost crates

mod runtime_config;

pub use runtime_config::*;
