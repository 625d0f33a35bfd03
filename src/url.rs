use crate::types::{PrNumber, RepoKey};

/// Extract `(owner, repo)` from a GitHub URL.
///
/// Accepts both `https://` and `http://` schemes. Returns `None` when the URL
/// is malformed or does not contain at least an `owner/repo` path.
pub(crate) fn owner_repo_from_url(url: &str) -> Option<(String, String)> {
    let after_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let after_host = after_scheme.split_once('/')?.1;
    let after_host = strip_query_and_fragment(after_host);
    let mut parts = after_host.splitn(3, '/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    Some((owner.to_owned(), repo.to_owned()))
}

/// Parse a pull-request URL (`https://<host>/<owner>/<repo>/pull/<number>`)
/// into the repository key and PR number it points at.
///
/// Query strings (`?tab=files`) and fragments (`#discussion_r1`) are ignored,
/// as are trailing segments such as `/files`.
pub fn parse_pr_url(url: &str) -> Option<(RepoKey, PrNumber)> {
    let url = url.trim();
    let after_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (host, path) = after_scheme.split_once('/')?;
    if host.is_empty() {
        return None;
    }

    let segments: Vec<&str> = strip_query_and_fragment(path).split('/').collect();
    if segments.len() < 4 || segments[2] != "pull" {
        return None;
    }

    let key = RepoKey::parse(&format!("{}/{}", segments[0], segments[1]))?;
    let number = PrNumber::parse(segments[3])?;
    Some((key, number))
}

fn strip_query_and_fragment(path: &str) -> &str {
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    path.split_once('#').map_or(path, |(p, _)| p)
}
