use moka::future::Cache;
use serde::de::DeserializeOwned;

use crate::config::ServiceConfig;
use crate::types::{PrNumber, RepoKey};

use super::error::ServiceError;
use super::types::{GenerateRequest, GenerateResponse, PrId, error_detail};
use super::Backend;

/// [`Backend`] talking JSON over HTTP to the generation service.
///
/// Lookup results are kept in a moka cache for `cache_ttl_secs`; generation
/// always goes to the network.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    cache: Option<Cache<String, Vec<String>>>,
}

impl HttpBackend {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("readme-gen/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let cache = config.cache_ttl().map(|ttl| {
            Cache::builder()
                .max_capacity(500)
                .time_to_live(ttl)
                .build()
        });
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Serve from the cache, or fetch with `fetch` and remember the result.
    async fn cached<F>(&self, key: String, fetch: F) -> Result<Vec<String>, ServiceError>
    where
        F: Future<Output = Result<Vec<String>, ServiceError>>,
    {
        if let Some(c) = &self.cache
            && let Some(hit) = c.get(&key).await
        {
            tracing::debug!("cache hit for {key}");
            return Ok(hit);
        }
        let items = fetch.await?;
        if let Some(c) = &self.cache {
            c.insert(key, items.clone()).await;
        }
        Ok(items)
    }
}

impl Backend for HttpBackend {
    async fn search_repos(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        self.cached(format!("repos:{query}"), async {
            tracing::debug!("service: GET search-repos q={query:?}");
            let resp = self
                .http
                .get(self.endpoint("search-repos"))
                .query(&[("q", query)])
                .send()
                .await?;
            decode::<Vec<String>>(resp).await
        })
        .await
    }

    async fn list_prs(&self, repo: &RepoKey) -> Result<Vec<String>, ServiceError> {
        let repo = repo.full_name();
        self.cached(format!("prs:{repo}"), async {
            tracing::debug!("service: GET list-prs repo={repo}");
            let resp = self
                .http
                .get(self.endpoint("list-prs"))
                .query(&[("repo", repo.as_str())])
                .send()
                .await?;
            let ids = decode::<Vec<PrId>>(resp).await?;
            Ok(ids.into_iter().map(PrId::into_string).collect())
        })
        .await
    }

    async fn generate(&self, repo_url: &str, pr_number: PrNumber) -> Result<String, ServiceError> {
        tracing::debug!("service: POST generate repo_url={repo_url} pr_number={pr_number}");
        let resp = self
            .http
            .post(self.endpoint("generate"))
            .json(&GenerateRequest {
                repo_url,
                pr_number: pr_number.get(),
            })
            .send()
            .await?;
        Ok(decode::<GenerateResponse>(resp).await?.response)
    }
}

/// Turn a response into `T`, mapping non-2xx statuses to
/// [`ServiceError::Status`] with whatever `detail` the body carries.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ServiceError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        let detail = error_detail(&body);
        tracing::debug!("service: {status} detail={detail:?}");
        return Err(ServiceError::Status { status, detail });
    }
    serde_json::from_slice(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}
