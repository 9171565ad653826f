//! Configuration file handling for cinstall
//!
//! This module contains data structures for:
//! - `cinstall.yaml` - Project manifest declaring the installable components
//!
//! Per-component files (`component.yaml`, `.cinstall.yaml`) live with the
//! components, see [`crate::component::descriptor`].

pub mod manifest;

pub use manifest::{ComponentEntry, EntrySource, MANIFEST_FILE, Manifest};
