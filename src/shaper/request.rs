use super::prompts::{
    DEEP_RESEARCH_SYSTEM_INSTRUCTION, FAST_SYSTEM_INSTRUCTION, SEARCH_ONLY_SYSTEM_INSTRUCTION,
};
use crate::types::Mode;

/// Budget de raciocínio do modo rápido
pub const FAST_THINKING_BUDGET: u32 = 1024;

/// Budget de raciocínio do modo deep research
pub const DEEP_RESEARCH_THINKING_BUDGET: u32 = 16384;

/// SearchOnly não raciocina, só lista resultados
pub const SEARCH_ONLY_THINKING_BUDGET: u32 = 0;

/// Configuração da requisição derivada do modo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestConfig {
    /// Esforço de raciocínio do serviço
    pub thinking_budget: u32,
    /// Contrato comportamental do modo
    pub system_instruction: &'static str,
    /// Ferramenta de busca web (sempre ligada)
    pub web_search: bool,
}

impl RequestConfig {
    pub fn for_mode(mode: Mode) -> Self {
        let (thinking_budget, system_instruction) = match mode {
            Mode::Fast => (FAST_THINKING_BUDGET, FAST_SYSTEM_INSTRUCTION),
            Mode::DeepResearch => (DEEP_RESEARCH_THINKING_BUDGET, DEEP_RESEARCH_SYSTEM_INSTRUCTION),
            Mode::SearchOnly => (SEARCH_ONLY_THINKING_BUDGET, SEARCH_ONLY_SYSTEM_INSTRUCTION),
        };

        Self {
            thinking_budget,
            system_instruction,
            web_search: true,
        }
    }
}

impl From<Mode> for RequestConfig {
    fn from(mode: Mode) -> Self {
        Self::for_mode(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budgets_per_mode() {
        assert_eq!(RequestConfig::for_mode(Mode::Fast).thinking_budget, 1024);
        assert_eq!(RequestConfig::for_mode(Mode::DeepResearch).thinking_budget, 16384);
        assert_eq!(RequestConfig::for_mode(Mode::SearchOnly).thinking_budget, 0);
    }

    #[test]
    fn test_search_tool_always_enabled() {
        for mode in [Mode::Fast, Mode::DeepResearch, Mode::SearchOnly] {
            assert!(RequestConfig::for_mode(mode).web_search);
        }
    }

    #[test]
    fn test_both_toggles_equal_search_only() {
        let both = RequestConfig::from(Mode::from_toggles(true, true));
        let search_only = RequestConfig::from(Mode::SearchOnly);

        assert_eq!(both, search_only);
        assert_eq!(both.thinking_budget, 0);
        assert_eq!(both.system_instruction, SEARCH_ONLY_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn test_instructions_differ_per_mode() {
        let fast = RequestConfig::for_mode(Mode::Fast);
        let deep = RequestConfig::for_mode(Mode::DeepResearch);
        let search = RequestConfig::for_mode(Mode::SearchOnly);

        assert_ne!(fast.system_instruction, deep.system_instruction);
        assert_ne!(deep.system_instruction, search.system_instruction);
    }
}
