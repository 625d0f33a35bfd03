// service module: the remote endpoints the form talks to

pub mod client;
pub mod error;
pub mod stub;
pub mod types;

pub use client::HttpBackend;
pub use error::ServiceError;
pub use stub::StubBackend;

use crate::types::{PrNumber, RepoKey};

/// The three remote operations behind the form.
///
/// Futures are `Send` so the session engine can run lookups as spawned tasks
/// while it keeps handling input.
pub trait Backend: Send + Sync + 'static {
    /// `GET /search-repos?q=`: repository suggestions for a partial query.
    fn search_repos(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, ServiceError>> + Send;

    /// `GET /list-prs?repo=`: PR identifiers for a repository.
    fn list_prs(
        &self,
        repo: &RepoKey,
    ) -> impl Future<Output = Result<Vec<String>, ServiceError>> + Send;

    /// `POST /generate`: the generated README for a repository and PR.
    fn generate(
        &self,
        repo_url: &str,
        pr_number: PrNumber,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}
