//! Querying remotes without cloning

use git2::{Direction, Remote, RemoteCallbacks};

use super::auth::setup_auth_callbacks;
use super::clone::normalize_url;
use super::error::interpret_git_error;
use crate::error::{CinstallError, Result};

/// Commit that `git_ref` (or HEAD) currently points at on the remote.
///
/// Returns `None` when the remote has no such branch or tag, which is the
/// case for refs that name a commit directly.
pub fn remote_commit(url: &str, git_ref: Option<&str>) -> Result<Option<String>> {
    let unreachable = |e: &git2::Error| CinstallError::GitCloneFailed {
        url: url.to_string(),
        reason: interpret_git_error(e),
    };

    let mut remote = Remote::create_detached(normalize_url(url).as_ref()).map_err(|e| unreachable(&e))?;
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);
    let connection = remote
        .connect_auth(Direction::Fetch, Some(callbacks), None)
        .map_err(|e| unreachable(&e))?;
    let heads = connection.list().map_err(|e| unreachable(&e))?;

    // Peeled tag entries come first so annotated tags resolve to commits.
    let wanted = match git_ref {
        None => vec!["HEAD".to_string()],
        Some(name) => vec![
            format!("refs/heads/{name}"),
            format!("refs/tags/{name}^{{}}"),
            format!("refs/tags/{name}"),
        ],
    };

    Ok(wanted.iter().find_map(|name| {
        heads
            .iter()
            .find(|head| head.name() == name)
            .map(|head| head.oid().to_string())
    }))
}
