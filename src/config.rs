// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO CLIENTE GEMINI E DO HISTÓRICO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::path::PathBuf;
use std::time::Duration;

/// Modelo padrão do Gemini
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// URL base padrão da API Gemini
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Arquivo padrão do histórico de conversas
pub const DEFAULT_HISTORY_FILE: &str = "deep_search_history.json";

/// Erros de configuração
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY (ou API_KEY) não definida")]
    MissingApiKey,
}

/// Configuração do cliente Gemini.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Chave da API (nunca logada)
    pub api_key: String,

    /// Identificador do modelo.
    /// Padrão: `gemini-2.5-flash`
    pub model: String,

    /// URL base da API, sem barra final.
    pub base_url: String,

    /// Timeout HTTP por requisição. `None` = sem limite.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Cria configuração com valores padrão para a chave informada.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Carrega configuração do Gemini a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `GEMINI_API_KEY`: chave da API (fallback: `API_KEY`)
/// - `GEMINI_MODEL`: modelo (padrão: `gemini-2.5-flash`)
/// - `GEMINI_API_BASE_URL`: URL base customizada (opcional)
/// - `GEMINI_TIMEOUT_SECS`: timeout HTTP em segundos (opcional)
///
/// # Exemplo
///
/// ```rust,ignore
/// // .env
/// GEMINI_API_KEY=sua-chave
/// GEMINI_MODEL=gemini-2.5-pro
///
/// // código
/// let config = load_gemini_config()?;
/// assert_eq!(config.model, "gemini-2.5-pro");
/// ```
pub fn load_gemini_config() -> Result<GeminiConfig, ConfigError> {
    gemini_config_from(|key| std::env::var(key).ok())
}

fn gemini_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<GeminiConfig, ConfigError> {
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let api_key = non_blank("GEMINI_API_KEY")
        .or_else(|| non_blank("API_KEY"))
        .ok_or(ConfigError::MissingApiKey)?;

    let mut config = GeminiConfig::new(api_key.trim());

    if let Some(model) = non_blank("GEMINI_MODEL") {
        config = config.with_model(model.trim());
        log::info!("📦 GEMINI_MODEL={}", config.model);
    }

    if let Some(base_url) = non_blank("GEMINI_API_BASE_URL") {
        config = config.with_base_url(base_url.trim());
        log::info!("📦 GEMINI_API_BASE_URL={}", config.base_url);
    }

    if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS").and_then(|s| s.trim().parse::<u64>().ok()) {
        if secs > 0 {
            config.timeout = Some(Duration::from_secs(secs));
            log::info!("📦 GEMINI_TIMEOUT_SECS={}", secs);
        }
    }

    log::info!("🔧 Gemini: modelo {} em {}", config.model, config.base_url);

    Ok(config)
}

/// Configuração do armazenamento de histórico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Arquivo JSON com a lista de sessões
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

/// Carrega configuração do histórico (`DEEP_SEARCH_HISTORY`).
pub fn load_history_config() -> HistoryConfig {
    history_config_from(|key| std::env::var(key).ok())
}

fn history_config_from(lookup: impl Fn(&str) -> Option<String>) -> HistoryConfig {
    let mut config = HistoryConfig::default();

    if let Some(path) = lookup("DEEP_SEARCH_HISTORY").filter(|p| !p.trim().is_empty()) {
        config.path = PathBuf::from(path.trim());
        log::info!("📦 DEEP_SEARCH_HISTORY={}", config.path.display());
    }

    config
}
