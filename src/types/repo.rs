use std::fmt;

use crate::url::owner_repo_from_url;

/// A fully-formed `owner/repo` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoKey {
    pub owner: String,
    pub name: String,
}

impl RepoKey {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Parse free-form repository input into a `RepoKey`.
    ///
    /// Accepts `owner/repo` and `http(s)://<host>/owner/repo[/...]`. The input
    /// is split on the first `/`; the repository part ends at the next `/`.
    /// Both parts must be non-empty. A trailing `.git` is dropped.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.starts_with("https://") || input.starts_with("http://") {
            let (owner, name) = owner_repo_from_url(input)?;
            return Self::from_parts(&owner, &name);
        }
        let (owner, rest) = input.split_once('/')?;
        let name = rest.split_once('/').map_or(rest, |(n, _)| n);
        Self::from_parts(owner, name)
    }

    fn from_parts(owner: &str, name: &str) -> Option<Self> {
        let name = name.strip_suffix(".git").unwrap_or(name);
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A strictly positive pull-request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrNumber(u64);

impl PrNumber {
    pub fn new(n: u64) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    /// Parse user input such as `"42"`, `" 42 "` or `"#42"`.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u64>().ok().and_then(Self::new)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
