//! CLI command implementations.

pub mod export;
pub mod stages;
pub mod validate;
