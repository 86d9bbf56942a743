//! OpenAI-compatible embedding and completion clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use studentia_core::error::{Error, Result as CoreResult};
use studentia_core::traits::{Completer, Embedder};
use studentia_core::types::EmbeddingVector;

fn build_client(api_key: &str, timeout: Duration) -> Result<Client> {
    anyhow::ensure!(!api_key.trim().is_empty(), "missing OpenAI API key");
    let mut headers = HeaderMap::new();
    let auth = format!("Bearer {}", api_key.trim());
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&auth).context("invalid OpenAI API key")?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .context("failed to build OpenAI HTTP client")
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Blocking query-embedding client for `POST {base_url}/embeddings`.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!model.trim().is_empty(), "missing OpenAI embedding model name");
        let client = build_client(&api_key, timeout)?;
        Ok(Self { client, endpoint: endpoint(&base_url, "embeddings"), model })
    }

    fn request(&self, text: &str) -> Result<EmbeddingVector> {
        let request = EmbeddingRequest { model: &self.model, input: text };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .context("failed to call OpenAI embeddings")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("OpenAI embeddings request failed ({}): {}", status, body);
        }
        let parsed: EmbeddingResponse = resp.json().context("failed to parse OpenAI embedding response")?;
        let first = parsed
            .data
            .into_iter()
            .min_by_key(|entry| entry.index)
            .context("OpenAI returned no embeddings")?;
        Ok(first.embedding)
    }
}

impl Embedder for OpenAiEmbedder {
    fn dim(&self) -> Option<usize> {
        None
    }

    fn embed(&self, text: &str) -> CoreResult<EmbeddingVector> {
        self.request(text).map_err(|e| {
            tracing::warn!(model = %self.model, error = %e, "embedding request failed");
            Error::EmbeddingUnavailable(format!("{e:#}"))
        })
    }
}

/// Blocking text-completion client for `POST {base_url}/completions`.
#[derive(Clone)]
pub struct OpenAiCompleter {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: usize,
}

impl OpenAiCompleter {
    pub fn new(api_key: String, base_url: String, model: String, max_tokens: usize, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!model.trim().is_empty(), "missing OpenAI completion model name");
        let client = build_client(&api_key, timeout)?;
        Ok(Self { client, endpoint: endpoint(&base_url, "completions"), model, max_tokens })
    }

    fn request(&self, prompt: &str) -> Result<String> {
        let body = CompletionRequest { model: &self.model, prompt, max_tokens: self.max_tokens };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .context("failed to call OpenAI completions")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("OpenAI completions request failed ({}): {}", status, text);
        }
        let parsed: CompletionResponse = resp.json().context("failed to parse OpenAI completion response")?;
        let choice = parsed.choices.into_iter().next().context("OpenAI returned no choices")?;
        Ok(choice.text)
    }
}

impl Completer for OpenAiCompleter {
    fn complete(&self, prompt: &str) -> CoreResult<String> {
        self.request(prompt).map_err(|e| {
            tracing::warn!(model = %self.model, error = %e, "completion request failed");
            Error::CompletionUnavailable(format!("{e:#}"))
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}
