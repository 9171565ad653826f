//! Shared helpers used by several modules.

pub mod fs;
