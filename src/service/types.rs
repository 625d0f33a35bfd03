use serde::{Deserialize, Serialize};

/// Body of `POST /generate`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub repo_url: &'a str,
    pub pr_number: u64,
}

/// Successful reply from `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// A PR identifier from `GET /list-prs`. The service is not consistent about
/// sending numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PrId {
    Number(u64),
    Text(String),
}

impl PrId {
    pub fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Error payload. `detail` is usually a string, but request validation
/// failures carry a list of `{ "msg": ... }` objects instead.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        }
    }
}

/// Extract a human-readable message from a non-2xx response body.
pub fn error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body).ok()?.message()
}
