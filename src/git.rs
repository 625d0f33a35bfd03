use std::path::Path;
use std::process::Command;

use crate::types::RepoKey;

/// Detect the repository of the directory at `path` from its git remotes, to
/// pre-fill the repository field.
///
/// Tries the `origin` remote first, falls back to the first listed remote.
pub fn detect_repo(path: &Path) -> Option<RepoKey> {
    let url = git(path, &["remote", "get-url", "origin"]).or_else(|| {
        let remotes = git(path, &["remote"])?;
        let first = remotes.lines().next()?.trim().to_owned();
        git(path, &["remote", "get-url", &first])
    })?;
    let key = parse_remote_url(&url);
    tracing::debug!("git: remote {url} -> {key:?}");
    key
}

/// Run `git <args>` in `path` and return trimmed stdout, or `None` on any
/// failure or empty output.
fn git(path: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let out = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if out.is_empty() { None } else { Some(out) }
}

/// Parse `owner/repo` from an SSH (`git@host:owner/repo.git`,
/// `ssh://git@host/owner/repo`) or HTTPS remote URL.
fn parse_remote_url(url: &str) -> Option<RepoKey> {
    if let Some(rest) = url.strip_prefix("git@") {
        return RepoKey::parse(rest.split_once(':')?.1);
    }
    if let Some(rest) = url.strip_prefix("ssh://") {
        return RepoKey::parse(rest.split_once('/')?.1);
    }
    if url.starts_with("https://") || url.starts_with("http://") {
        return RepoKey::parse(url);
    }
    None
}
