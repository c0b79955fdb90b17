//! Gemini adapter: transport trait, reqwest HTTP implementation, wire serde.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::try_stream;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    BoxedFragmentStream, ChatModel, GeminiConfig, ModelReply, ModelRequest, ProviderError,
    ProviderFuture, RequestPart,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub type GeminiChunkStream<'a> =
    Pin<Box<dyn Stream<Item = Result<GeminiApiResponse, ProviderError>> + Send + 'a>>;

pub trait GeminiTransport: Send + Sync {
    fn generate<'a>(
        &'a self,
        model: String,
        request: GeminiApiRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<GeminiApiResponse, ProviderError>>;

    fn stream<'a>(
        &'a self,
        model: String,
        request: GeminiApiRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<GeminiChunkStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiApiRequest {
    pub contents: Vec<GeminiApiContent>,
    #[serde(rename = "safetySettings", skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<GeminiApiSafetySetting>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiApiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiApiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiApiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        rename = "inlineData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inline_data: Option<GeminiApiInlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiApiInlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiApiSafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "topK", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiApiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiApiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiApiCandidate {
    #[serde(default)]
    pub content: Option<GeminiApiContent>,
}

impl GeminiApiResponse {
    /// Concatenated text of the first candidate, or `None` when the service
    /// answered without any text parts.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;

        let mut text = String::new();
        for part in &content.parts {
            if let Some(value) = &part.text {
                text.push_str(value);
            }
        }

        if text.is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorEnvelope {
    error: GeminiApiError,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<GeminiApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    base_url: String,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str, operation: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model,
            operation
        )
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("Gemini request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(message)
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                ProviderError::unavailable(message)
            }
            _ => ProviderError::transport(message),
        }
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn generate<'a>(
        &'a self,
        model: String,
        request: GeminiApiRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<GeminiApiResponse, ProviderError>> {
        Box::pin(async move {
            let url = self.endpoint(&model, "generateContent");
            let response = self
                .client
                .post(url)
                .query(&[("key", api_key.as_str())])
                .json(&request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<GeminiApiResponse>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }

    fn stream<'a>(
        &'a self,
        model: String,
        request: GeminiApiRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<GeminiChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            let url = self.endpoint(&model, "streamGenerateContent");
            let response = self
                .client
                .post(url)
                .query(&[("key", api_key.as_str()), ("alt", "sse")])
                .json(&request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        ProviderError::timeout(err.to_string())
                    } else {
                        ProviderError::transport(err.to_string())
                    }
                })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let stream = try_stream! {
                let mut chunks = response.bytes_stream();
                let mut sse_buffer = String::new();

                while let Some(item) = chunks.next().await {
                    let bytes = item.map_err(|err| ProviderError::transport(err.to_string()))?;
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|err| ProviderError::transport(err.to_string()))?;
                    sse_buffer.push_str(text);

                    while let Some(newline_index) = sse_buffer.find('\n') {
                        let line = sse_buffer.drain(..=newline_index).collect::<String>();
                        let line = line.trim();

                        if !line.starts_with("data:") {
                            continue;
                        }

                        let payload = line.trim_start_matches("data:").trim();
                        if payload.is_empty() {
                            continue;
                        }

                        let parsed: GeminiApiResponse = serde_json::from_str(payload)
                            .map_err(|err| ProviderError::transport(err.to_string()))?;
                        yield parsed;
                    }
                }
            };

            Ok(Box::pin(stream) as GeminiChunkStream<'a>)
        })
    }
}

#[derive(Clone)]
pub struct GeminiModel {
    config: Arc<GeminiConfig>,
    transport: Arc<dyn GeminiTransport>,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig, transport: Arc<dyn GeminiTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn default_http_transport(client: Client) -> GeminiHttpTransport {
        GeminiHttpTransport::new(client)
    }

    pub(crate) fn build_api_request(&self, request: &ModelRequest) -> GeminiApiRequest {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => GeminiApiPart {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                RequestPart::InlineImage { mime, data } => GeminiApiPart {
                    text: None,
                    inline_data: Some(GeminiApiInlineData {
                        mime_type: mime.clone(),
                        data: BASE64.encode(data),
                    }),
                },
            })
            .collect();

        let settings = if request.has_images() {
            &self.config.vision_safety_settings
        } else {
            &self.config.safety_settings
        };
        let safety_settings = settings
            .iter()
            .map(|setting| GeminiApiSafetySetting {
                category: setting.category.wire_name(),
                threshold: setting.threshold.wire_name(),
            })
            .collect();

        GeminiApiRequest {
            contents: vec![GeminiApiContent {
                role: Some("user".to_string()),
                parts,
            }],
            safety_settings,
            // Per-call options win; unset fields fall back to the
            // construction-time generation config.
            generation_config: Some(GeminiApiGenerationConfig {
                temperature: request
                    .options
                    .temperature
                    .or(self.config.generation.temperature),
                top_k: request.options.top_k.or(self.config.generation.top_k),
                top_p: request.options.top_p.or(self.config.generation.top_p),
            }),
        }
    }

    fn model_name(&self, request: &ModelRequest) -> String {
        if request.model.trim().is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        }
    }
}

impl ChatModel for GeminiModel {
    fn generate<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelReply, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let model = self.model_name(&request);
            let api_request = self.build_api_request(&request);
            let api_key = self.config.api_key.expose().to_string();
            let response = self
                .transport
                .generate(model, api_request, api_key)
                .await?;

            Ok(ModelReply {
                text: response.text(),
            })
        })
    }

    fn generate_stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedFragmentStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let model = self.model_name(&request);
            let api_request = self.build_api_request(&request);
            let api_key = self.config.api_key.expose().to_string();
            let mut chunks = self.transport.stream(model, api_request, api_key).await?;

            let stream = try_stream! {
                while let Some(chunk) = chunks.next().await {
                    if let Some(fragment) = chunk?.text() {
                        yield fragment;
                    }
                }
            };

            Ok(Box::pin(stream) as BoxedFragmentStream<'a>)
        })
    }
}
