// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DO SERVIÇO DE GERAÇÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para o serviço hospedado que gera a resposta.
// O shaper só precisa de "envie esta configuração, receba texto + grounding";
// transporte, autenticação e escolha de modelo ficam aqui.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::shaper::RequestConfig;
use crate::types::{Query, RawResponse};

/// Erros do serviço de geração (rede, autenticação, cota)
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication rejected: {0}")]
    AuthError(String),

    #[error("Rate limit or quota exceeded")]
    RateLimitError,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response format: {0}")]
    ParseError(String),
}

/// Requisição enviada ao serviço de geração
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Texto da pergunta do usuário
    pub prompt: String,
    /// Contrato comportamental do modo selecionado
    pub system_instruction: String,
    /// Budget de raciocínio (0 desativa)
    pub thinking_budget: u32,
    /// Ferramenta de busca web habilitada
    pub web_search: bool,
}

impl GenerationRequest {
    /// Monta a requisição a partir da query e da configuração do modo
    pub fn new(query: &Query, config: &RequestConfig) -> Self {
        Self {
            prompt: query.as_str().to_string(),
            system_instruction: config.system_instruction.to_string(),
            thinking_budget: config.thinking_budget,
            web_search: config.web_search,
        }
    }
}

/// Trait principal para clientes do serviço de geração.
///
/// Permite trocar o provedor (Gemini, stub de testes) sem tocar no shaper.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Envia a requisição e devolve texto + referências de grounding
    async fn generate(&self, request: &GenerationRequest) -> Result<RawResponse, LlmError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO STUB PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente determinístico: sempre devolve a mesma resposta (ou a mesma falha)
#[derive(Debug, Default)]
pub struct StubGenerationClient {
    pub response: Option<RawResponse>,
    pub failure: Option<String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl StubGenerationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: RawResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// Cliente que falha em toda chamada com `NetworkError`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Quantas vezes `generate` foi chamado
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Última requisição recebida
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl GenerationClient for StubGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<RawResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }

        if let Some(message) = &self.failure {
            return Err(LlmError::NetworkError(message.clone()));
        }

        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| RawResponse::text("Stub generated answer")))
    }
}
