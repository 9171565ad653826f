//! Git operations backing git components
//!
//! This module handles:
//! - Cloning repositories (HTTPS, SSH and local paths)
//! - Checking out a branch, tag or commit after cloning
//! - Asking a remote which commit a ref currently points at
//!
//! Authentication is delegated to git's native system:
//! - SSH agent and keys from ~/.ssh/
//! - Git credential helpers
//! - Anonymous access for public repositories

mod auth;
mod checkout;
mod clone;
mod error;
mod remote;

pub use checkout::{checkout_ref, head_commit};
pub use clone::clone;
pub use remote::remote_commit;
