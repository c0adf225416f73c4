// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESPONSE SHAPER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Pipeline de uma única passada por pergunta:
//   1. Mode → RequestConfig (budget + system instruction + busca web)
//   2. Chamada ao serviço de geração
//   3. Decomposição do texto por modo (resposta / perguntas / resultados)
//   4. Extração e deduplicação das fontes
//
// Sem estado: chamadas concorrentes não compartilham nada mutável.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extração de JSON embutido em texto livre.
pub mod extract;
/// System instructions de cada modo.
pub mod prompts;
mod request;
mod sources;

pub use request::{
    RequestConfig, DEEP_RESEARCH_THINKING_BUDGET, FAST_THINKING_BUDGET,
    SEARCH_ONLY_THINKING_BUDGET,
};
pub use sources::extract_sources;

use std::sync::Arc;

use crate::llm::{GenerationClient, GenerationRequest, LlmError};
use crate::types::{AnswerResult, Mode, Query, RawResponse, SearchResultItem};
use extract::{find_trailing_json_fence, json_arrays, strip_code_fences};

/// Prefixo do texto de diagnóstico quando o SearchOnly não pôde ser parseado
pub const SEARCH_RESULTS_PARSE_FAILURE_PREFIX: &str =
    "Could not parse structured results. Raw response:\n\n";

/// Quantidade de perguntas relacionadas exibidas
pub const RELATED_QUESTIONS_COUNT: usize = 3;

/// Erros do shaper (apenas falhas do serviço; saída malformada nunca é erro)
#[derive(Debug, thiserror::Error)]
pub enum ShaperError {
    #[error("upstream generation service failed: {0}")]
    Upstream(#[source] LlmError),
}

/// Converte (query, modo) em `AnswerResult` via serviço de geração.
#[derive(Clone)]
pub struct ResponseShaper {
    client: Arc<dyn GenerationClient>,
}

impl ResponseShaper {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Executa o pipeline completo para uma pergunta.
    ///
    /// Falha apenas com [`ShaperError::Upstream`]; sem retry e sem timeout.
    pub async fn shape(&self, query: &Query, mode: Mode) -> Result<AnswerResult, ShaperError> {
        let config = RequestConfig::for_mode(mode);
        let request = GenerationRequest::new(query, &config);

        log::info!("🔍 [{}] {}", mode, query);

        let raw = self.client.generate(&request).await.map_err(|e| {
            log::error!("✗ Serviço de geração falhou: {}", e);
            ShaperError::Upstream(e)
        })?;

        let result = decompose(raw, mode);

        log::info!(
            "✓ {} fontes, {} perguntas relacionadas, {} resultados",
            result.sources.len(),
            result.related_questions.len(),
            result.search_results.len()
        );

        Ok(result)
    }
}

/// Decompõe a resposta bruta no resultado tipado. Nunca falha.
pub fn decompose(raw: RawResponse, mode: Mode) -> AnswerResult {
    match mode {
        Mode::SearchOnly => {
            let (text, search_results) = split_search_results(raw.text);
            AnswerResult {
                text,
                sources: Vec::new(),
                related_questions: Vec::new(),
                search_results,
            }
        }
        Mode::Fast | Mode::DeepResearch => {
            let sources = extract_sources(&raw.grounding);
            let (text, related_questions) = split_related_questions(raw.text);
            AnswerResult {
                text,
                sources,
                related_questions,
                search_results: Vec::new(),
            }
        }
    }
}

/// Separa o bloco ```json final (perguntas relacionadas) do texto da resposta.
///
/// Só o último bloco json é considerado; blocos anteriores ficam no texto.
///
/// - Bloco parseável: removido do texto (cercas incluídas)
/// - Bloco não parseável: texto intacto, sem perguntas
/// - Sem bloco: texto intacto, sem perguntas
///
/// Retorna sempre 0 ou 3 perguntas.
pub fn split_related_questions(text: String) -> (String, Vec<String>) {
    let Some(block) = find_trailing_json_fence(&text) else {
        return (text, Vec::new());
    };

    let questions = match serde_json::from_str::<Vec<String>>(block.body) {
        Ok(questions) => questions,
        Err(e) => {
            log::debug!("Bloco json de perguntas relacionadas inválido: {}", e);
            return (text, Vec::new());
        }
    };

    let mut cleaned = String::with_capacity(text.len() - block.range.len());
    cleaned.push_str(&text[..block.range.start]);
    cleaned.push_str(&text[block.range.end..]);

    let questions = if questions.len() >= RELATED_QUESTIONS_COUNT {
        questions.into_iter().take(RELATED_QUESTIONS_COUNT).collect()
    } else {
        log::debug!(
            "Esperadas {} perguntas relacionadas, recebidas {}",
            RELATED_QUESTIONS_COUNT,
            questions.len()
        );
        Vec::new()
    };

    (cleaned.trim().to_string(), questions)
}

/// Extrai os resultados do SearchOnly.
///
/// Primeira tentativa no texto cru, segunda após remover cercas de código;
/// se ambas falharem, o texto vira diagnóstico e a lista fica vazia.
/// Um `[]` só vale como resposta quando nenhuma lista não vazia é encontrada.
pub fn split_search_results(text: String) -> (String, Vec<SearchResultItem>) {
    let parsed = match first_parseable_results(&text) {
        Some(results) if !results.is_empty() => return (String::new(), results),
        other => other,
    };

    let unfenced = strip_code_fences(&text);
    match first_parseable_results(&unfenced).or(parsed) {
        Some(results) => (String::new(), results),
        None => {
            log::warn!("⚠ Resposta SearchOnly sem array JSON válido ({} chars)", text.len());
            (format!("{}{}", SEARCH_RESULTS_PARSE_FAILURE_PREFIX, text), Vec::new())
        }
    }
}

/// Primeira lista não vazia de resultados; `Some(vec![])` se só houver `[]`
fn first_parseable_results(text: &str) -> Option<Vec<SearchResultItem>> {
    let mut empty = None;
    for candidate in json_arrays(text) {
        match serde_json::from_str::<Vec<SearchResultItem>>(candidate) {
            Ok(results) if !results.is_empty() => return Some(results),
            Ok(results) => {
                empty.get_or_insert(results);
            }
            Err(_) => {}
        }
    }
    empty
}
