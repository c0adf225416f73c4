// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DEEP SEARCH CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Uso:
//   deep-search-cli "Qual é a população do Brasil?"
//   deep-search-cli --deep "pergunta complexa"
//   deep-search-cli --search-only "rust web frameworks"
//   deep-search-cli --chat            (thread interativa)
//   deep-search-cli --history         (lista conversas salvas)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use deep_search::display::render_answer;
use deep_search::history::ChatMessage;
use deep_search::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [
        PathBuf::from(".env"),
        PathBuf::from("../.env"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env"),
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    if dotenvy::dotenv().is_err() {
        eprintln!("⚠ Nenhum arquivo .env encontrado. Certifique-se de que GEMINI_API_KEY está definida.");
    }
}

/// Argumentos da linha de comando
#[derive(Debug, Default)]
struct CliArgs {
    deep: bool,
    search_only: bool,
    chat: bool,
    history: bool,
    question: String,
}

impl CliArgs {
    fn parse(args: &[String]) -> Self {
        let mut cli = Self::default();
        let mut words = Vec::new();

        for arg in args {
            match arg.as_str() {
                "--deep" => cli.deep = true,
                "--search-only" => cli.search_only = true,
                "--chat" => cli.chat = true,
                "--history" => cli.history = true,
                _ => words.push(arg.as_str()),
            }
        }

        cli.question = words.join(" ");
        cli
    }

    fn mode(&self) -> Mode {
        Mode::from_toggles(self.deep, self.search_only)
    }
}

fn print_usage(program: &str) {
    eprintln!("Deep Search CLI v{}", deep_search::VERSION);
    eprintln!();
    eprintln!("Uso: {} [opções] <pergunta>", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --deep          Modo deep research (budget alto, relatório completo)");
    eprintln!("  --search-only   Apenas lista de resultados (tem precedência sobre --deep)");
    eprintln!("  --chat          Thread interativa (/new, /fast, /deep, /search, /quit)");
    eprintln!("  --history       Lista conversas salvas");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} \"Qual é a população do Brasil em 2024?\"", program);
    eprintln!("  {} --deep \"Estado da arte em baterias de estado sólido\"", program);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("deep-search-cli");
    let cli = CliArgs::parse(args.get(1..).unwrap_or_default());

    let history_config = load_history_config();
    let store = SessionStore::load(Arc::new(LocalBackend::new(history_config.path))).await;

    if cli.history {
        print_history(&store);
        return Ok(());
    }

    if !cli.chat && cli.question.trim().is_empty() {
        print_usage(program);
        std::process::exit(1);
    }

    let gemini_config = load_gemini_config().unwrap_or_else(|e| {
        eprintln!("✗ Erro: {}", e);
        eprintln!();
        eprintln!("Certifique-se de que:");
        eprintln!("  1. O arquivo .env existe no diretório do projeto");
        eprintln!("  2. O arquivo contém: GEMINI_API_KEY=sua-chave-aqui");
        eprintln!();
        eprintln!("Ou defina a variável de ambiente diretamente:");
        eprintln!("  export GEMINI_API_KEY=sua-chave-aqui");
        std::process::exit(1);
    });

    let client = GeminiClient::new(gemini_config)?;
    log::info!("🤖 Modelo: {}", client.model());
    let shaper = ResponseShaper::new(Arc::new(client));
    let mut conversation = Conversation::new(shaper, store);

    if cli.chat {
        return run_chat(&mut conversation, cli.mode()).await;
    }

    println!("{}", RULE);
    println!(" DEEP SEARCH v{} — {}", deep_search::VERSION, cli.mode());
    println!("{}", RULE);
    println!();
    println!("Pergunta: {}", cli.question.trim());
    println!();

    let reply = conversation.ask(&cli.question, cli.mode()).await?;
    print_reply(&reply);

    if reply.is_error {
        std::process::exit(2);
    }

    Ok(())
}

fn print_reply(reply: &ChatMessage) {
    println!("{}", RULE);
    println!("{}", render_answer(&reply.to_answer()));
    println!("{}", RULE);
    println!();
}

fn print_history(store: &SessionStore) {
    if store.is_empty() {
        println!("Nenhuma conversa salva.");
        return;
    }

    println!("{}", RULE);
    println!(" HISTÓRICO ({} conversas)", store.len());
    println!("{}", RULE);
    for session in store.sessions() {
        println!(
            "  {}  {}  ({} mensagens)  {}",
            session.created_at.format("%Y-%m-%d %H:%M"),
            short_id(&session.id),
            session.messages.len(),
            session.title
        );
    }
}

/// Primeiros 8 caracteres do id
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Loop interativo: cada linha é uma pergunta na mesma thread.
///
/// Um número (1-3) reenvia a pergunta relacionada correspondente da última resposta.
async fn run_chat(conversation: &mut Conversation, initial_mode: Mode) -> anyhow::Result<()> {
    let mut mode = initial_mode;
    let mut related: Vec<String> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Modo: {}. Comandos: /new /fast /deep /search /quit", mode);

    loop {
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                conversation.new_thread();
                related.clear();
                println!("Nova conversa.");
                continue;
            }
            "/fast" | "/deep" | "/search" => {
                mode = Mode::from_name(input.trim_start_matches('/'));
                println!("Modo: {}", mode);
                continue;
            }
            _ => {}
        }

        let question = match input.parse::<usize>() {
            Ok(n) if (1..=related.len()).contains(&n) => related[n - 1].clone(),
            _ => input.to_string(),
        };

        let reply = conversation.ask(&question, mode).await?;
        print_reply(&reply);
        related = reply.related_queries.clone();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cli_parse_question() {
        let cli = CliArgs::parse(&args(&["o", "que", "é", "Rust?"]));
        assert_eq!(cli.question, "o que é Rust?");
        assert_eq!(cli.mode(), Mode::Fast);
    }

    #[test]
    fn test_cli_flags_precedence() {
        let cli = CliArgs::parse(&args(&["--deep", "--search-only", "rust"]));
        assert_eq!(cli.mode(), Mode::SearchOnly);

        let cli = CliArgs::parse(&args(&["--deep", "rust"]));
        assert_eq!(cli.mode(), Mode::DeepResearch);
    }

    #[test]
    fn test_short_id_respects_char_boundaries() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("sessão-ção-ção"), "sessão-ç");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_cli_chat_and_history() {
        let cli = CliArgs::parse(&args(&["--chat"]));
        assert!(cli.chat);
        assert!(cli.question.is_empty());

        assert!(CliArgs::parse(&args(&["--history"])).history);
    }
}
