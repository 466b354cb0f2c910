use crate::prelude::{debug, eyre, info, warn, Result};
use indicatif::ProgressBar;
use mathreel_core::failure::{Failure, FailureKind};
use mathreel_core::pipeline::{
    edit_failed, generate_failed, generate_ok, MSG_EDIT_EMPTY, MSG_EDIT_OK, MSG_GENERATE_EMPTY,
};
use mathreel_core::scene::{
    build_edit_body, build_generation_body, EditRequest, GenerationRequest, LlmRequestBody,
    LlmSettings,
};
use std::time::Duration;

/// Everything needed to reach the LLM endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub priority: String,
    pub timeout: Duration,
}

/// Raw model output plus the status line to show the user.
///
/// `text` is returned verbatim; extracting the scene from it is the caller's job.
#[derive(Debug, Clone)]
pub struct LlmReply {
    pub text: String,
    pub status: String,
}

/// Client for the hosted text-generation endpoint.
///
/// One POST per call, no retries. Every failure comes back as a [`Failure`]
/// with empty text semantics; nothing is raised past this boundary.
pub struct LlmClient {
    http: reqwest::Client,
    url: String,
    settings: LlmSettings,
}

/// Build an HTTP client with the endpoint's auth and content-type headers.
///
/// A missing key is not an error here: the endpoint rejects the first request
/// and that rejection is what the user sees.
pub fn create_llm_client(config: &LlmConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    if let Some(key) = &config.api_key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Key {key}"))
                .map_err(|e| eyre!("Invalid header value: {}", e))?,
        );
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Helper to set spinner message if spinner is present
fn set_spinner_msg(spinner: Option<&ProgressBar>, msg: impl Into<String>) {
    if let Some(s) = spinner {
        s.set_message(msg.into());
    }
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_none() {
            warn!("No API key configured; requests to {} will likely be rejected", config.url);
        }

        Ok(Self {
            http: create_llm_client(config)?,
            url: config.url.clone(),
            settings: LlmSettings {
                model: config.model.clone(),
                priority: config.priority.clone(),
            },
        })
    }

    /// Ask the model for a brand-new scene.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        spinner: Option<&ProgressBar>,
    ) -> std::result::Result<LlmReply, Failure> {
        set_spinner_msg(spinner, "Sending request to AI API...");
        info!("Requesting a new scene ({} chars of prompt)", request.prompt.len());

        let body = build_generation_body(request, &self.settings);
        let text = self
            .complete(&body)
            .await
            .map_err(|e| Failure::new(classify(&e), generate_failed(&e.to_string())))?
            .ok_or_else(|| Failure::new(FailureKind::EmptyGeneration, MSG_GENERATE_EMPTY))?;

        set_spinner_msg(spinner, "✅ AI code generation complete!");
        Ok(LlmReply {
            text,
            status: generate_ok(&request.prompt),
        })
    }

    /// Ask the model to change an existing scene.
    pub async fn edit(
        &self,
        request: &EditRequest,
        spinner: Option<&ProgressBar>,
    ) -> std::result::Result<LlmReply, Failure> {
        set_spinner_msg(spinner, "Sending edit request to AI API...");
        info!(
            "Requesting an edit of a {}-line scene",
            request.code.lines().count()
        );

        let body = build_edit_body(request, &self.settings);
        let text = self
            .complete(&body)
            .await
            .map_err(|e| Failure::new(classify(&e), edit_failed(&e.to_string())))?
            .ok_or_else(|| Failure::new(FailureKind::EmptyGeneration, MSG_EDIT_EMPTY))?;

        set_spinner_msg(spinner, "✅ Code edited successfully!");
        Ok(LlmReply {
            text,
            status: MSG_EDIT_OK.to_string(),
        })
    }

    /// POST the body and pull out the `output` field. `Ok(None)` when the field
    /// is missing or blank.
    async fn complete(&self, body: &LlmRequestBody) -> reqwest::Result<Option<String>> {
        debug!("POST {} model={} priority={}", self.url, body.model, body.priority);

        let response = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let value: serde_json::Value = response.json().await?;
        let output = value
            .get("output")
            .and_then(|output| output.as_str())
            .filter(|output| !output.trim().is_empty())
            .map(str::to_string);

        if output.is_none() {
            warn!("LLM response had no usable output field");
        }

        Ok(output)
    }
}

fn classify(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Upstream
    }
}
