// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRAÇÃO DE JSON EMBUTIDO EM TEXTO LIVRE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// - Arrays JSON de nível superior via varredura de profundidade de colchetes
//   (ciente de strings), tolerando prosa antes/depois e colchetes aninhados
// - Blocos cercados ```json ... ```
// - Remoção de marcadores de code fence
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```json\s*(.*?)```").expect("valid json fence regex")
});

static FENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid fence marker regex"));

/// Bloco ```json ... ``` encontrado no texto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Intervalo em bytes do bloco inteiro, cercas incluídas
    pub range: Range<usize>,
    /// Conteúdo entre as cercas (sem whitespace nas pontas)
    pub body: &'a str,
}

/// Último bloco cercado marcado como json (o bloco final da resposta).
///
/// Blocos json anteriores são exemplos de código do corpo e não contam.
pub fn find_trailing_json_fence(text: &str) -> Option<FencedBlock<'_>> {
    let captures = JSON_FENCE.captures_iter(text).last()?;
    let whole = captures.get(0)?;
    let body = captures.get(1)?.as_str().trim();
    Some(FencedBlock {
        range: whole.range(),
        body,
    })
}

/// Remove todos os marcadores de code fence (```json, ```, ...)
pub fn strip_code_fences(text: &str) -> String {
    FENCE_MARKER.replace_all(text, "").trim().to_string()
}

/// Iterador sobre arrays JSON de nível superior, na ordem em que aparecem.
///
/// Cada item é um trecho balanceado `[...]`. Colchetes dentro de strings JSON
/// não contam. Um `[` sem fechamento é ignorado e a varredura continua no
/// byte seguinte.
pub fn json_arrays(text: &str) -> JsonArrays<'_> {
    JsonArrays { text, pos: 0 }
}

/// Ver [`json_arrays`].
#[derive(Debug, Clone)]
pub struct JsonArrays<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for JsonArrays<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let start = self.pos + self.text[self.pos..].find('[')?;
            match balanced_end(self.text.as_bytes(), start) {
                Some(end) => {
                    self.pos = end + 1;
                    return Some(&self.text[start..=end]);
                }
                None => self.pos = start + 1,
            }
        }
        None
    }
}

/// Índice do `]` que fecha o `[` em `start`, ou None se desbalanceado.
///
/// Trabalha em bytes: os delimitadores são ASCII e nunca aparecem dentro de
/// sequências UTF-8 multibyte, então os índices são sempre char boundaries.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (b == b']').then_some(i);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_with_surrounding_prose() {
        let text = "Sure, here:\n[{\"title\":\"A\",\"url\":\"http://a\",\"snippet\":\"s\"}]\nHope it helps.";
        let arrays: Vec<_> = json_arrays(text).collect();
        assert_eq!(
            arrays,
            vec!["[{\"title\":\"A\",\"url\":\"http://a\",\"snippet\":\"s\"}]"]
        );
    }

    #[test]
    fn test_nested_and_multiple_arrays() {
        let text = "a [1, [2, 3]] b [\"x\"] c";
        let arrays: Vec<_> = json_arrays(text).collect();
        assert_eq!(arrays, vec!["[1, [2, 3]]", "[\"x\"]"]);
    }

    #[test]
    fn test_brackets_inside_strings_ignored() {
        let text = r#"[{"title":"Vec<[u8]> ]] explained","url":"http://x"}] tail"#;
        let arrays: Vec<_> = json_arrays(text).collect();
        assert_eq!(arrays.len(), 1);
        assert!(arrays[0].ends_with("}]"));
        assert!(serde_json::from_str::<serde_json::Value>(arrays[0]).is_ok());
    }

    #[test]
    fn test_escaped_quotes_in_strings() {
        let text = r#"[{"snippet":"he said \"[hi]\""}]"#;
        assert_eq!(json_arrays(text).next(), Some(text));
    }

    #[test]
    fn test_unbalanced_opening_skipped() {
        let text = "nota [incompleta e depois [1,2]";
        let arrays: Vec<_> = json_arrays(text).collect();
        assert_eq!(arrays, vec!["[1,2]"]);
    }

    #[test]
    fn test_mismatched_brace_rejected() {
        assert_eq!(json_arrays("[1}").next(), None);
    }

    #[test]
    fn test_no_array() {
        assert_eq!(json_arrays("I cannot comply.").next(), None);
        assert_eq!(json_arrays("").next(), None);
    }

    #[test]
    fn test_unicode_text_around_array() {
        let text = "Resultados — ação: [\"ç\", \"日本\"] fim";
        assert_eq!(json_arrays(text).next(), Some("[\"ç\", \"日本\"]"));
    }

    #[test]
    fn test_find_trailing_json_fence() {
        let text = "Answer.\n\n```json\n[\"a\", \"b\", \"c\"]\n```\n";
        let block = find_trailing_json_fence(text).unwrap();
        assert_eq!(block.body, "[\"a\", \"b\", \"c\"]");
        assert_eq!(&text[block.range.clone()], "```json\n[\"a\", \"b\", \"c\"]\n```");
    }

    #[test]
    fn test_find_json_fence_last_wins() {
        let text = "```json\n[1]\n```\nmeio\n```json\n[2]\n```";
        let block = find_trailing_json_fence(text).unwrap();
        assert_eq!(block.body, "[2]");
        assert_eq!(&text[block.range.clone()], "```json\n[2]\n```");
    }

    #[test]
    fn test_plain_fence_not_json() {
        assert!(find_trailing_json_fence("```\n[\"a\"]\n```").is_none());
        assert!(find_trailing_json_fence("no fences here").is_none());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("sem cercas"), "sem cercas");
    }
}
