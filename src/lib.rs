//! # Deep Search
//!
//! Cliente de busca conversacional: a pergunta do usuário é enviada a um LLM
//! hospedado (Gemini) com a ferramenta de busca web habilitada, e a resposta é
//! decomposta em texto, fontes citadas, resultados estruturados e perguntas
//! relacionadas.
//!
//! ## Modos
//!
//! | Modo | Budget | Saída |
//! |------|--------|-------|
//! | `Fast` | 1024 | Resposta concisa + 3 perguntas relacionadas |
//! | `DeepResearch` | 16384 | Relatório exaustivo com citações + 3 perguntas |
//! | `SearchOnly` | 0 | Apenas lista de resultados (título, url, snippet) |
//!
//! ## Arquitetura
//!
//! - [`shaper`]: o protocolo de modelagem da resposta (núcleo)
//! - [`llm`]: fronteira com o serviço de geração
//! - [`history`] / [`conversation`]: transcript persistido pelo chamador
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use deep_search::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GeminiClient::new(load_gemini_config()?)?;
//!     let shaper = ResponseShaper::new(Arc::new(client));
//!     let query = Query::new("Quais são os melhores frameworks Rust para web?")?;
//!     let result = shaper.shape(&query, Mode::Fast).await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

#![warn(rust_2018_idioms)]

/// Tipos fundamentais: [`Query`], [`Mode`], [`Source`], [`AnswerResult`]...
pub mod types;

/// Response shaper: Mode → RequestConfig, chamada ao serviço e decomposição.
pub mod shaper;

/// Clientes do serviço de geração.
///
/// Define a trait `GenerationClient` e implementações para:
/// - Gemini (`generateContent` com Google Search)
/// - Stub determinístico para testes
pub mod llm;

/// Configuração via variáveis de ambiente:
///
/// - `GEMINI_API_KEY` / `API_KEY`: chave da API
/// - `GEMINI_MODEL`: modelo (padrão: "gemini-2.5-flash")
/// - `GEMINI_API_BASE_URL`: URL base customizada (opcional)
/// - `GEMINI_TIMEOUT_SECS`: timeout HTTP (opcional)
/// - `DEEP_SEARCH_HISTORY`: arquivo do histórico
pub mod config;

/// Histórico de conversas persistido (load na inicialização, save a cada mudança).
pub mod history;

/// Conversa: shaper + histórico.
pub mod conversation;

/// Domínio, favicon e renderização em texto.
pub mod display;

pub use config::{load_gemini_config, load_history_config, GeminiConfig, HistoryConfig};
pub use conversation::Conversation;
pub use llm::{GeminiClient, GenerationClient, LlmError};
pub use shaper::{ResponseShaper, ShaperError};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns.
pub mod prelude {
    pub use crate::config::{load_gemini_config, load_history_config};
    pub use crate::conversation::Conversation;
    pub use crate::history::{ChatMessage, ChatSession, LocalBackend, SessionStore};
    pub use crate::llm::{GeminiClient, GenerationClient, StubGenerationClient};
    pub use crate::shaper::{decompose, RequestConfig, ResponseShaper, ShaperError};
    pub use crate::types::*;
}
