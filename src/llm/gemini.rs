// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO GEMINI (generateContent + Google Search)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerationClient, GenerationRequest, LlmError};
use crate::config::GeminiConfig;
use crate::display::hostname;
use crate::types::{GroundingReference, RawResponse, WebReference};

/// Texto usado quando o serviço responde sem nenhum conteúdo
pub(crate) const EMPTY_RESPONSE_TEXT: &str = "No result generated.";

/// Cliente para a API REST do Gemini
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Modelo configurado
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<RawResponse, LlmError> {
        let body = GenerateContentRequest::from_request(request);
        let start = std::time::Instant::now();

        log::debug!(
            "🌐 POST {} (thinking_budget={}, web_search={})",
            self.endpoint(),
            request.thinking_budget,
            request.web_search
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &error_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let raw = parsed.into_raw_response();
        log::info!(
            "✓ Gemini respondeu em {}ms ({} chars, {} refs)",
            start.elapsed().as_millis(),
            raw.text.len(),
            raw.grounding.len()
        );

        Ok(raw)
    }
}

/// Converte status HTTP + corpo de erro em `LlmError`
fn classify_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => LlmError::AuthError(message),
        429 => LlmError::RateLimitError,
        400 if message.contains("API key") => LlmError::AuthError(message),
        _ => LlmError::ApiError { status, message },
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS DO PROTOCOLO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerationRequest) -> Self {
        let tools = if request.web_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        Self {
            contents: vec![Content::text(Some("user"), &request.prompt)],
            system_instruction: Content::text(None, &request.system_instruction),
            tools,
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: request.thinking_budget,
                },
            },
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
                thought: None,
            }],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Extrai texto (partes não-"thought" do primeiro candidato) e grounding
    fn into_raw_response(self) -> RawResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return RawResponse::text(EMPTY_RESPONSE_TEXT);
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought.unwrap_or(false))
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let grounding = candidate
            .grounding_metadata
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .into_iter()
                    .map(GroundingChunk::into_reference)
                    .collect()
            })
            .unwrap_or_default();

        RawResponse {
            text: if text.is_empty() {
                EMPTY_RESPONSE_TEXT.to_string()
            } else {
                text
            },
            grounding,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

impl GroundingChunk {
    /// Chunk sem `uri` não é uma referência web utilizável
    fn into_reference(self) -> GroundingReference {
        let web = self.web.and_then(|web| {
            let uri = web.uri.filter(|uri| !uri.is_empty())?;
            let title = web
                .title
                .filter(|title| !title.is_empty())
                .or_else(|| hostname(&uri))
                .unwrap_or_else(|| uri.clone());
            Some(WebReference { title, uri })
        });
        GroundingReference { web }
    }
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
