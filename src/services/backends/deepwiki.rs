use crate::enums::backend_error::BackendError;
use crate::enums::raw_response::RawResponse;
use crate::traits::analysis_backend::AnalysisBackend;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    repo_url: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    deep_research: bool,
}

/// Backend speaking the DeepWiki chat-completions protocol. Each query is a
/// single non-streaming POST; response envelopes are left intact for the
/// normalizer to unwrap.
pub struct DeepWikiBackend {
    client: reqwest::Client,
    base_url: String,
    deep_research: bool,
}

impl DeepWikiBackend {
    pub fn new(base_url: String, deep_research: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            deep_research,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl AnalysisBackend for DeepWikiBackend {
    async fn query(
        &self,
        repository: &str,
        revision: &str,
        prompt: &str,
    ) -> Result<RawResponse, BackendError> {
        let request = ChatRequest {
            repo_url: repository.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: format!("Revision under review: {}\n\n{}", revision, prompt),
            }],
            stream: false,
            deep_research: self.deep_research,
        };

        log::debug!("📡 Querying {} for {}", self.endpoint(), repository);

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout { seconds: 0 }
                } else {
                    BackendError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::ApiError {
                status: status.as_u16(),
                message: truncate(&body, 300),
            });
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(RawResponse::from_value(value)),
            Err(_) => Ok(RawResponse::Text(body)),
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
