use std::collections::BTreeMap;

use http::StatusCode;
use serde::Deserialize;

use crate::types::{PrNumber, RepoKey};

use super::error::ServiceError;
use super::Backend;

const MAX_RESULTS: usize = 5;

/// A backend that serves fixture data without any network calls.
///
/// Useful for integration tests and the `--offline` demo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StubBackend {
    #[serde(default)]
    pub repos: Vec<String>,
    /// Open PR numbers per `owner/repo`.
    #[serde(default)]
    pub prs: BTreeMap<String, Vec<u64>>,
}

impl StubBackend {
    /// A small built-in data set for the offline demo.
    pub fn demo() -> Self {
        let prs = [
            ("octocat/Hello-World", vec![1, 5, 7]),
            ("octocat/Spoon-Knife", vec![12, 30]),
            ("rust-lang/rust", vec![120_001, 120_044]),
            ("tokio-rs/tokio", vec![6001]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
        Self {
            repos: [
                "octocat/Hello-World",
                "octocat/Spoon-Knife",
                "octocat/linguist",
                "rust-lang/rust",
                "rust-lang/cargo",
                "tokio-rs/tokio",
            ]
            .into_iter()
            .map(ToOwned::to_owned)
            .collect(),
            prs,
        }
    }

    fn not_found(what: String) -> ServiceError {
        ServiceError::Status {
            status: StatusCode::NOT_FOUND,
            detail: Some(what),
        }
    }
}

impl Backend for StubBackend {
    async fn search_repos(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .repos
            .iter()
            .filter(|r| r.to_lowercase().contains(&needle))
            .take(MAX_RESULTS)
            .cloned()
            .collect())
    }

    async fn list_prs(&self, repo: &RepoKey) -> Result<Vec<String>, ServiceError> {
        let numbers = self
            .prs
            .get(&repo.full_name())
            .ok_or_else(|| Self::not_found(format!("Repository {repo} not found")))?;
        Ok(numbers.iter().map(u64::to_string).collect())
    }

    async fn generate(&self, repo_url: &str, pr_number: PrNumber) -> Result<String, ServiceError> {
        let key = RepoKey::parse(repo_url)
            .ok_or_else(|| Self::not_found(format!("Repository {repo_url} not found")))?;
        let known = self
            .prs
            .get(&key.full_name())
            .ok_or_else(|| Self::not_found(format!("Repository {key} not found")))?;
        if !known.contains(&pr_number.get()) {
            return Err(Self::not_found(format!(
                "Pull request #{pr_number} not found in {key}"
            )));
        }
        Ok(format!(
            "# {}\n\nREADME updated for changes introduced in #{pr_number}.\n",
            key.name
        ))
    }
}
