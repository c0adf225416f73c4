// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HELPERS DE EXIBIÇÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Domínio, favicon e renderização em texto puro de um AnswerResult.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt::Write;

use crate::types::AnswerResult;

/// Tamanho do favicon listado junto de cada fonte
pub const FAVICON_SIZE: u32 = 32;

/// Hostname de uma URL, se ela for válida
pub fn hostname(uri: &str) -> Option<String> {
    url::Url::parse(uri)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}

/// Domínio curto para cards de fonte (sem "www."); "web" se a URL for inválida
pub fn display_domain(uri: &str) -> String {
    match hostname(uri) {
        Some(host) => host.strip_prefix("www.").unwrap_or(&host).to_string(),
        None => "web".to_string(),
    }
}

/// URL do favicon do domínio via serviço s2 do Google
pub fn favicon_url(uri: &str, size: u32) -> Option<String> {
    let host = hostname(uri)?;
    Some(format!(
        "https://www.google.com/s2/favicons?domain={}&sz={}",
        urlencoding::encode(&host),
        size
    ))
}

/// Renderiza o resultado para o terminal.
///
/// O texto da resposta sai como veio (markdown não é interpretado).
pub fn render_answer(result: &AnswerResult) -> String {
    let mut out = String::new();

    if !result.sources.is_empty() {
        out.push_str("Fontes:\n");
        for (i, source) in result.sources.iter().enumerate() {
            let _ = writeln!(
                out,
                "  [{}] {} ({})\n      {}",
                i + 1,
                source.title,
                display_domain(&source.uri),
                source.uri
            );
            if let Some(icon) = favicon_url(&source.uri, FAVICON_SIZE) {
                let _ = writeln!(out, "      ícone: {}", icon);
            }
        }
        out.push('\n');
    }

    if !result.search_results.is_empty() {
        out.push_str("Resultados:\n");
        for (i, item) in result.search_results.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, item.title);
            let _ = writeln!(out, "     {}", item.url);
            if !item.snippet.is_empty() {
                let _ = writeln!(out, "     {}", item.snippet);
            }
        }
        out.push('\n');
    }

    if !result.text.is_empty() {
        out.push_str("Resposta:\n");
        out.push_str(result.text.trim_end());
        out.push_str("\n\n");
    }

    if !result.related_questions.is_empty() {
        out.push_str("Relacionadas:\n");
        for (i, question) in result.related_questions.iter().enumerate() {
            let _ = writeln!(out, "  {}) {}", i + 1, question);
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SearchResultItem, Source};

    #[test]
    fn test_display_domain() {
        assert_eq!(display_domain("https://www.rust-lang.org/learn"), "rust-lang.org");
        assert_eq!(display_domain("https://docs.rs/tokio"), "docs.rs");
        assert_eq!(display_domain("not a url"), "web");
    }

    #[test]
    fn test_favicon_url() {
        assert_eq!(
            favicon_url("https://docs.rs/serde", 64).as_deref(),
            Some("https://www.google.com/s2/favicons?domain=docs.rs&sz=64")
        );
        assert!(favicon_url("::::", 64).is_none());
    }

    #[test]
    fn test_render_answer_sections() {
        let result = AnswerResult {
            text: "Resposta **curta**.".into(),
            sources: vec![Source {
                title: "Rust".into(),
                uri: "https://www.rust-lang.org".into(),
            }],
            related_questions: vec!["a?".into(), "b?".into(), "c?".into()],
            search_results: vec![],
        };

        let rendered = render_answer(&result);
        assert!(rendered.contains("[1] Rust (rust-lang.org)"));
        assert!(rendered.contains("ícone: https://www.google.com/s2/favicons?domain=www.rust-lang.org&sz=32"));
        assert!(rendered.contains("Resposta **curta**."));
        assert!(rendered.contains("3) c?"));
        assert!(!rendered.contains("Resultados:"));
    }

    #[test]
    fn test_render_search_results() {
        let result = AnswerResult {
            search_results: vec![SearchResultItem {
                title: "crates.io".into(),
                url: "https://crates.io".into(),
                snippet: String::new(),
            }],
            ..AnswerResult::default()
        };

        let rendered = render_answer(&result);
        assert!(rendered.starts_with("Resultados:"));
        assert!(rendered.contains("1. crates.io"));
        assert!(!rendered.contains("Resposta:"));
    }
}
