use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::events::{HallucinationRisk, MessageMeta, Source};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Decoded answer from `GET /ask`
#[derive(Debug, Clone, PartialEq)]
pub struct AskResponse {
    pub answer: String,
    pub meta: MessageMeta,
    pub sources: Vec<Source>,
}

impl AskResponse {
    /// Decode a response body leniently.
    ///
    /// The body must be a JSON object. An `answer` that is absent, null,
    /// `false`, `0` or empty falls back to the whole body serialized as JSON;
    /// any other value is shown as its own text. `sources` that is absent or
    /// not an array yields no sources.
    pub fn from_value(body: Value) -> Result<Self, BackendError> {
        if !body.is_object() {
            return Err(BackendError::Malformed {
                kind: json_kind(&body),
            });
        }

        let answer = answer_text(body.get("answer")).unwrap_or_else(|| body.to_string());

        let meta = MessageMeta {
            confidence: body.get("confidence").and_then(Value::as_f64),
            hallucination_risk: body
                .get("hallucination_risk")
                .and_then(Value::as_str)
                .and_then(HallucinationRisk::parse),
        };

        let sources = match body.get("sources") {
            Some(Value::Array(items)) => items.iter().map(Source::from_value).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            answer,
            meta,
            sources,
        })
    }
}

/// Text of an answer value that has something to show
fn answer_text(answer: Option<&Value>) -> Option<String> {
    match answer? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The remote triage/RAG service
#[async_trait]
pub trait TriageBackend: Send + Sync {
    /// Ask one question and wait for the answer
    async fn ask(&self, query: &str) -> Result<AskResponse, BackendError>;

    /// Human-readable address, shown in the footer
    fn describe(&self) -> String;
}

/// HTTP client for the backend's `/ask` endpoint
#[derive(Clone)]
pub struct HttpTriageBackend {
    client: reqwest::Client,
    ask_url: Url,
}

impl HttpTriageBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let ask_url = Self::ask_url(&config.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, ask_url })
    }

    /// Resolve `<base>/ask`, keeping any path prefix on the base address
    pub fn ask_url(base_url: &str) -> Result<Url, BackendError> {
        let base = format!("{}/", base_url.trim().trim_end_matches('/'));
        Ok(Url::parse(&base)?.join("ask")?)
    }
}

#[async_trait]
impl TriageBackend for HttpTriageBackend {
    async fn ask(&self, query: &str) -> Result<AskResponse, BackendError> {
        let response = self
            .client
            .get(self.ask_url.clone())
            .query(&[("query", query)])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;

        AskResponse::from_value(body)
    }

    fn describe(&self) -> String {
        self.ask_url.to_string()
    }
}
