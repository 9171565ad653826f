//! Human-readable explanations of libgit2 failures

use git2::{Error, ErrorClass};

type Check = fn(&str, ErrorClass) -> bool;

const EXPLANATIONS: &[(Check, &str)] = &[
    (
        |msg, _| {
            msg.contains("not found")
                || msg.contains("404")
                || msg.contains("too many redirects")
                || msg.contains("authentication replays")
        },
        "Repository not found",
    ),
    (
        |msg, _| msg.contains("authentication") || msg.contains("credentials"),
        "Authentication failed",
    ),
    (
        |msg, _| msg.contains("permission denied") || msg.contains("access denied"),
        "Permission denied",
    ),
    (
        |msg, _| {
            msg.contains("connection")
                || msg.contains("network")
                || msg.contains("timeout")
                || msg.contains("timed out")
        },
        "Network error",
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("certificate"),
        "Certificate error",
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("ssl"),
        "SSL error",
    ),
];

/// Turn a git2 error into a short reason for the user
pub fn interpret_git_error(err: &Error) -> String {
    let message = err.message().to_lowercase();
    let class = err.class();

    if let Some((_, explanation)) = EXPLANATIONS.iter().find(|(check, _)| check(&message, class)) {
        return (*explanation).to_string();
    }

    match class {
        ErrorClass::Http => format!("HTTP error: {}", err.message()),
        ErrorClass::Ssh => format!("SSH error: {}", err.message()),
        _ => err.message().to_string(),
    }
}
