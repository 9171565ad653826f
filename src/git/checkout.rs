//! Ref resolution and checkout in a freshly cloned repository

use git2::{Commit, Oid, Repository, build::CheckoutBuilder};

use crate::error::{CinstallError, Result};

fn find_commit<'r>(repo: &'r Repository, git_ref: &str) -> Option<Commit<'r>> {
    let candidates = [
        format!("refs/remotes/origin/{git_ref}"),
        format!("refs/tags/{git_ref}"),
        format!("refs/heads/{git_ref}"),
        git_ref.to_string(),
    ];
    for candidate in &candidates {
        if let Ok(commit) = repo
            .find_reference(candidate)
            .and_then(|reference| reference.peel_to_commit())
        {
            return Some(commit);
        }
    }

    if let Ok(commit) = Oid::from_str(git_ref).and_then(|oid| repo.find_commit(oid)) {
        return Some(commit);
    }

    repo.revparse_single(git_ref)
        .and_then(|object| object.peel_to_commit())
        .ok()
}

/// Check out `git_ref` (branch, tag or commit) with a detached HEAD.
///
/// Returns the id of the checked out commit.
pub fn checkout_ref(repo: &Repository, git_ref: &str) -> Result<String> {
    let checkout_failed = |reason: String| CinstallError::GitCheckoutFailed {
        git_ref: git_ref.to_string(),
        reason,
    };

    let commit = find_commit(repo, git_ref)
        .ok_or_else(|| checkout_failed("Could not resolve reference".to_string()))?;

    repo.set_head_detached(commit.id())
        .map_err(|e| checkout_failed(e.message().to_string()))?;

    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout))
        .map_err(|e| checkout_failed(e.message().to_string()))?;

    Ok(commit.id().to_string())
}

/// Id of the commit HEAD points at
pub fn head_commit(repo: &Repository) -> Result<String> {
    repo.head()
        .and_then(|head| head.peel_to_commit())
        .map(|commit| commit.id().to_string())
        .map_err(|e| CinstallError::GitCheckoutFailed {
            git_ref: "HEAD".to_string(),
            reason: e.message().to_string(),
        })
}
