use crate::config::{Config, USER_AGENT};
use crate::error::{AnalyzerError, Result};
use crate::range::RoundRange;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect, StatusCode, Url};
use serde_json::{Map, Value};

const ERROR_MESSAGE_LIMIT: usize = 250;

/// The single point of network access. Everything else talks to the indexer
/// through this trait.
#[async_trait]
pub trait IndexerApi: Send + Sync {
    fn base_url(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<Value>;
}

pub fn block_url(base: &str, round: u64) -> String {
    format!("{}/v2/blocks/{}", base.trim_end_matches('/'), round)
}

pub fn transactions_url(
    base: &str,
    range: &RoundRange,
    limit: u32,
    next: Option<&str>,
) -> Result<String> {
    let endpoint = format!("{}/v2/transactions", base.trim_end_matches('/'));
    let mut params = vec![
        ("min-round", range.min().to_string()),
        ("max-round", range.max().to_string()),
        ("limit", limit.to_string()),
    ];
    if let Some(token) = next {
        params.push(("next", token.to_string()));
    }

    Url::parse_with_params(&endpoint, &params)
        .map(String::from)
        .map_err(|e| AnalyzerError::Network(format!("invalid indexer URL {}: {}", endpoint, e)))
}

pub struct IndexerClient {
    base_url: String,
    http: reqwest::Client,
}

impl IndexerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        Ok(IndexerClient {
            base_url: config.indexer_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl IndexerApi for IndexerClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        interpret_response(status, &body)
    }
}

/// Maps an HTTP status and body onto the error taxonomy, or the decoded JSON.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Value> {
    if status.as_u16() >= 400 {
        let message = error_message(body);
        let lowered = message.to_lowercase();
        if status == StatusCode::NOT_FOUND
            && lowered.contains("block")
            && lowered.contains("not found")
        {
            return Err(AnalyzerError::NotFound);
        }
        return Err(AnalyzerError::Server {
            status: status.as_u16(),
            message,
        });
    }

    if body.is_empty() {
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }
        return Err(AnalyzerError::EmptyResponse(status.as_u16()));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) if is_blank(&value) => Ok(Value::Object(Map::new())),
        Ok(value) => Ok(value),
        Err(e) => Err(AnalyzerError::Decode(e.to_string())),
    }
}

// null, false, zero, "", "0" and [] all read as "nothing returned"
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    truncate(&from_json.unwrap_or_else(|| body.to_string()), ERROR_MESSAGE_LIMIT)
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
