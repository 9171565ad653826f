//! Error types and handling for cinstall
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for cinstall operations
#[derive(Error, Diagnostic, Debug)]
pub enum CinstallError {
    // Component errors
    #[error("Failed to fetch component '{name}': {reason}")]
    #[diagnostic(
        code(cinstall::component::fetch_failed),
        help("Check that the component source exists and is readable")
    )]
    FetchFailed { name: String, reason: String },

    #[error("Failed to load component '{name}': {reason}")]
    #[diagnostic(
        code(cinstall::component::load_failed),
        help("Check the component.yaml descriptor of the component")
    )]
    LoadFailed { name: String, reason: String },

    #[error("No such component: {name}")]
    #[diagnostic(
        code(cinstall::component::not_found),
        help("Declare the component in cinstall.yaml")
    )]
    NoSuchComponent { name: String },

    // State errors
    #[error("Waiting for state {target} aborted: state is {state}")]
    #[diagnostic(code(cinstall::state::wait_aborted))]
    WaitAborted { target: String, state: String },

    #[error("Timed out after {waited_ms} ms waiting for state {target}")]
    #[diagnostic(code(cinstall::state::wait_timed_out))]
    WaitTimedOut { target: String, waited_ms: u128 },

    // Task errors
    #[error("Background task panicked: {message}")]
    #[diagnostic(code(cinstall::task::panicked))]
    TaskPanicked { message: String },

    // Manifest errors
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(cinstall::manifest::not_found),
        help("Create a cinstall.yaml or pass --manifest <PATH>")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to parse manifest: {path}: {reason}")]
    #[diagnostic(code(cinstall::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Invalid manifest: {message}")]
    #[diagnostic(code(cinstall::manifest::invalid))]
    ManifestInvalid { message: String },

    // Git errors
    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(cinstall::git::clone_failed),
        help("Check that URL is correct and you have access to repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to checkout '{git_ref}': {reason}")]
    #[diagnostic(code(cinstall::git::checkout_failed))]
    GitCheckoutFailed { git_ref: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(cinstall::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(cinstall::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(cinstall::fs::io_error))]
    IoError { message: String },

    // Selection errors
    #[error("Invalid component pattern '{pattern}': {reason}")]
    #[diagnostic(code(cinstall::select::invalid_pattern))]
    InvalidPattern { pattern: String, reason: String },

    #[error("No components match '{pattern}'")]
    #[diagnostic(
        code(cinstall::select::no_match),
        help("Run 'cinstall status' to list declared components")
    )]
    NoComponentsMatched { pattern: String },

    #[error("Some components could not be installed: {names}")]
    #[diagnostic(
        code(cinstall::install::failed),
        help("Re-run with -v for details; a new install attempt retries failed components")
    )]
    InstallFailed { names: String },
}

impl CinstallError {
    /// Whether this failure is absorbed by the per-component installation
    /// boundary and turned into an ERROR state.
    pub fn is_install_failure(&self) -> bool {
        matches!(
            self,
            CinstallError::FetchFailed { .. }
                | CinstallError::LoadFailed { .. }
                | CinstallError::NoSuchComponent { .. }
                | CinstallError::WaitAborted { .. }
                | CinstallError::WaitTimedOut { .. }
        )
    }
}

impl From<std::io::Error> for CinstallError {
    fn from(err: std::io::Error) -> Self {
        CinstallError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CinstallError {
    fn from(err: serde_yaml::Error) -> Self {
        CinstallError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for CinstallError {
    fn from(err: git2::Error) -> Self {
        CinstallError::GitCloneFailed {
            url: "unknown".to_string(),
            reason: err.message().to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CinstallError>;
