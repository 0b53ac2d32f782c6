//! Clients for the hosted OpenAI-compatible API.

use crate::config::LlmSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// A configured OpenAI-compatible endpoint.
///
/// Chat completions and transcription go through `async-openai`; speech
/// synthesis posts to the same base URL with the raw HTTP client because
/// providers accept voices the typed client does not model.
#[derive(Clone)]
pub struct HostedApi {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl HostedApi {
    /// Build clients from settings, reading the API key from the environment.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings.api_key()?;
        Self::new(
            &settings.api_base,
            &api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Build clients for an explicit endpoint and key.
    pub fn new(api_base: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);
        let client = Client::with_config(config).with_http_client(http.clone());

        Ok(Self {
            client,
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// The typed OpenAI client.
    pub fn client(&self) -> &Client<OpenAIConfig> {
        &self.client
    }

    /// The underlying HTTP client (shares the request timeout).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Full URL for an API path such as `audio/speech`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
