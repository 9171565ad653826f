//! Repository cloning

use std::borrow::Cow;
use std::path::Path;

use git2::{FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};

use super::auth::setup_auth_callbacks;
use super::error::interpret_git_error;
use crate::error::{CinstallError, Result};

/// Whether `url` points at a repository on the local filesystem
pub(super) fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || url.starts_with('/') || Path::new(url).is_absolute()
}

/// Rewrite SCP-style `git@host:path` into `ssh://git@host/path`, which
/// libgit2 parses reliably.
pub(super) fn normalize_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }
    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Clone `url` into `target`.
///
/// A shallow clone only fetches the default branch and is ignored for
/// local repositories, which libgit2 cannot clone shallowly.
pub fn clone(url: &str, target: &Path, shallow: bool) -> Result<Repository> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    if shallow && !is_local_url(url) {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    builder
        .clone(&normalize_url(url), target)
        .map_err(|e| CinstallError::GitCloneFailed {
            url: url.to_string(),
            reason: interpret_git_error(&e),
        })
}
