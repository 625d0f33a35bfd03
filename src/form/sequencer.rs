use crate::types::RepoKey;

/// What the PR suggestion stream should do after the repository query settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrLookup {
    /// Issue a PR lookup for this repository.
    Fetch(RepoKey),
    /// The query is not a complete `owner/repo`: drop any PR suggestions.
    Clear,
    /// Same repository as the last lookup; nothing to do.
    Unchanged,
}

/// Derives the PR lookup key from the debounced repository query.
///
/// Refires only when the parsed `owner/repo` pair changes, so typing past the
/// repository name (`foo/bar/`) does not issue a second identical lookup.
#[derive(Debug, Clone, Default)]
pub struct PrLookupSequencer {
    current: Option<RepoKey>,
}

impl PrLookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&RepoKey> {
        self.current.as_ref()
    }

    pub fn observe(&mut self, repo_query: &str) -> PrLookup {
        match RepoKey::parse(repo_query) {
            None => {
                self.current = None;
                PrLookup::Clear
            }
            Some(key) if self.current.as_ref() == Some(&key) => PrLookup::Unchanged,
            Some(key) => {
                self.current = Some(key.clone());
                PrLookup::Fetch(key)
            }
        }
    }

    /// Forget the last key so the next valid query always refires.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
