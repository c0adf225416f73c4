// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fmt;

/// Erros de construção de query
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query must not be empty")]
    Empty,
}

/// Pergunta do usuário (nunca vazia, sem espaços nas pontas)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Cria uma query validada.
    ///
    /// Texto vazio ou só com whitespace é rejeitado.
    pub fn new(text: impl AsRef<str>) -> Result<Self, QueryError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Texto da query
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Query {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Modo de operação da busca.
///
/// - `Fast`: resposta concisa com budget de raciocínio baixo
/// - `DeepResearch`: resposta exaustiva com budget alto
/// - `SearchOnly`: apenas listagem de resultados, sem prosa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Fast,
    DeepResearch,
    SearchOnly,
}

impl Mode {
    /// Resolve os dois toggles da interface em um único modo.
    ///
    /// `search_only` tem precedência: com ele ativo, `deep_research` é ignorado.
    pub fn from_toggles(deep_research: bool, search_only: bool) -> Self {
        match (deep_research, search_only) {
            (_, true) => Self::SearchOnly,
            (true, false) => Self::DeepResearch,
            (false, false) => Self::Fast,
        }
    }

    /// Converte nome textual (CLI/.env) para Mode.
    ///
    /// Case-insensitive; valores desconhecidos viram `Fast`.
    pub fn from_name(value: &str) -> Self {
        match value.to_lowercase().trim() {
            "deep" | "deep-research" | "deepresearch" => Self::DeepResearch,
            "search" | "search-only" | "searchonly" => Self::SearchOnly,
            _ => Self::Fast,
        }
    }

    /// Nome legível para logs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::DeepResearch => "Deep Research",
            Self::SearchOnly => "Search Only",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Fonte web citada na resposta (chave de unicidade: `uri`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Resultado estruturado do modo `SearchOnly`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "uri", alias = "link")]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// Par (título, uri) de uma página consultada pelo serviço
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebReference {
    pub title: String,
    pub uri: String,
}

/// Referência de grounding anexada à resposta do serviço
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingReference {
    /// Presente apenas quando a referência aponta para uma página web
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebReference>,
}

impl GroundingReference {
    /// Referência web com título e uri
    pub fn web(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            web: Some(WebReference {
                title: title.into(),
                uri: uri.into(),
            }),
        }
    }
}

/// Resposta bruta do serviço de geração
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub text: String,
    pub grounding: Vec<GroundingReference>,
}

impl RawResponse {
    /// Resposta só com texto, sem grounding
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounding: Vec::new(),
        }
    }

    /// Adiciona referências de grounding
    pub fn with_grounding(mut self, grounding: Vec<GroundingReference>) -> Self {
        self.grounding = grounding;
        self
    }
}

/// Resultado tipado consumido pelo resto da aplicação
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// Texto da resposta (vazio no SearchOnly quando os resultados foram parseados)
    pub text: String,
    /// Fontes deduplicadas por uri, na ordem da primeira ocorrência
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Perguntas relacionadas (0 ou 3)
    #[serde(default)]
    pub related_questions: Vec<String>,
    /// Resultados estruturados (somente SearchOnly)
    #[serde(default)]
    pub search_results: Vec<SearchResultItem>,
}
