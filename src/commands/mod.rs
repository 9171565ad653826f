//! Command implementations for cinstall CLI

pub mod completions;
pub mod install;
pub mod status;
