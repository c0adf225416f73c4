use std::collections::HashSet;

use crate::types::{GroundingReference, Source};

/// Extrai as fontes web das referências de grounding.
///
/// Referências sem par web são descartadas. Deduplica por `uri` preservando a
/// ordem da primeira ocorrência; uma repetição posterior não sobrescreve o título.
pub fn extract_sources(references: &[GroundingReference]) -> Vec<Source> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for web in references.iter().filter_map(|reference| reference.web.as_ref()) {
        if seen.insert(web.uri.as_str()) {
            sources.push(Source {
                title: web.title.clone(),
                uri: web.uri.clone(),
            });
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let refs = vec![
            GroundingReference::web("Primeiro", "https://a.com"),
            GroundingReference::web("B", "https://b.com"),
            GroundingReference::web("Segundo título", "https://a.com"),
            GroundingReference::web("C", "https://c.com"),
            GroundingReference::web("B de novo", "https://b.com"),
        ];

        let sources = extract_sources(&refs);
        let uris: Vec<_> = sources.iter().map(|s| s.uri.as_str()).collect();

        assert_eq!(uris, vec!["https://a.com", "https://b.com", "https://c.com"]);
        assert_eq!(sources[0].title, "Primeiro");
        assert_eq!(sources[1].title, "B");
    }

    #[test]
    fn test_non_web_references_dropped() {
        let refs = vec![
            GroundingReference::default(),
            GroundingReference::web("A", "https://a.com"),
            GroundingReference::default(),
        ];

        let sources = extract_sources(&refs);
        assert_eq!(
            sources,
            vec![Source {
                title: "A".into(),
                uri: "https://a.com".into()
            }]
        );
    }

    #[test]
    fn test_no_references() {
        assert!(extract_sources(&[]).is_empty());
    }

    #[test]
    fn test_uniqueness_over_generated_inputs() {
        // Sequências pseudo-aleatórias com muitas colisões de uri
        for seed in 0u64..50 {
            let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let refs: Vec<_> = (0..40)
                .map(|i| {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let key = (state >> 33) % 7;
                    if key == 6 {
                        GroundingReference::default()
                    } else {
                        GroundingReference::web(format!("t{}", i), format!("https://site{}.com", key))
                    }
                })
                .collect();

            let sources = extract_sources(&refs);

            let unique: HashSet<_> = sources.iter().map(|s| &s.uri).collect();
            assert_eq!(unique.len(), sources.len());

            let mut expected_order: Vec<&str> = Vec::new();
            for web in refs.iter().filter_map(|r| r.web.as_ref()) {
                if !expected_order.contains(&web.uri.as_str()) {
                    expected_order.push(&web.uri);
                }
            }
            let actual: Vec<_> = sources.iter().map(|s| s.uri.as_str()).collect();
            assert_eq!(actual, expected_order);
        }
    }
}
