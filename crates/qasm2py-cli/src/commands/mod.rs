//! CLI command implementations.

pub mod common;
pub mod gates;
pub mod translate;
pub mod version;
