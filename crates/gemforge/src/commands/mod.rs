//! CLI command implementations

pub mod common;
pub mod disable_gem;
pub mod enable_gem;
