// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HISTÓRICO DE CONVERSAS - Backends Local (JSON) / Memória
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// A lista de sessões é um único valor (JSON) lido uma vez na inicialização e
// regravado a cada mudança. Sem versionamento de schema: falha de parse na
// carga = histórico vazio.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::{AnswerResult, Mode, Query, SearchResultItem, Source};

/// Mensagem exibida quando o serviço de geração falha
pub const UPSTREAM_ERROR_MESSAGE: &str =
    "I encountered an error while searching. Please check your API key or try again later.";

/// Tamanho máximo do título de uma sessão (em caracteres)
pub const SESSION_TITLE_MAX_CHARS: usize = 48;

/// Autor da mensagem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Uma mensagem do transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_queries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_results: Vec<SearchResultItem>,
    /// Modo usado para gerar a resposta (apenas mensagens do modelo)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn base(role: Role, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            sources: Vec::new(),
            related_queries: Vec::new(),
            search_results: Vec::new(),
            mode: None,
            is_error: false,
            created_at: Utc::now(),
        }
    }

    /// Pergunta do usuário
    pub fn user(query: &Query) -> Self {
        Self::base(Role::User, query.as_str().to_string())
    }

    /// Resposta do modelo a partir do resultado do shaper
    pub fn model(result: AnswerResult, mode: Mode) -> Self {
        Self {
            sources: result.sources,
            related_queries: result.related_questions,
            search_results: result.search_results,
            mode: Some(mode),
            ..Self::base(Role::Model, result.text)
        }
    }

    /// Turno fixo de erro quando o serviço falha (sem fontes)
    pub fn upstream_error(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            is_error: true,
            ..Self::base(Role::Model, UPSTREAM_ERROR_MESSAGE.to_string())
        }
    }

    /// Reconstrói o AnswerResult exibível desta mensagem
    pub fn to_answer(&self) -> AnswerResult {
        AnswerResult {
            text: self.content.clone(),
            sources: self.sources.clone(),
            related_questions: self.related_queries.clone(),
            search_results: self.search_results.clone(),
        }
    }
}

/// Uma thread de conversa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Nova sessão intitulada pela primeira pergunta
    pub fn new(first_query: &Query) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: session_title(first_query.as_str()),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Última mensagem do modelo, se houver
    pub fn last_answer(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Model)
    }
}

/// Título curto derivado da pergunta
fn session_title(query: &str) -> String {
    let single_line = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= SESSION_TITLE_MAX_CHARS {
        single_line
    } else {
        let truncated: String = single_line.chars().take(SESSION_TITLE_MAX_CHARS).collect();
        format!("{}...", truncated.trim_end())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TRAIT: SessionBackend - armazenamento chave-valor da lista de sessões
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Backend que guarda a lista serializada de sessões.
///
/// Implementações disponíveis:
/// - `LocalBackend`: arquivo JSON local
/// - `MemoryBackend`: em memória (testes)
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Nome do backend
    fn name(&self) -> &'static str;

    /// Lê o valor guardado (`None` se nunca foi gravado)
    async fn get(&self) -> anyhow::Result<Option<String>>;

    /// Substitui o valor guardado
    async fn put(&self, value: &str) -> anyhow::Result<()>;
}

/// Backend que grava a lista de sessões em um arquivo JSON.
pub struct LocalBackend {
    path: PathBuf,
}

impl LocalBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SessionBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get(&self) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, value: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Grava em arquivo temporário e renomeia: leitores nunca veem JSON parcial
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

/// Backend em memória.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend já preenchido com um valor bruto
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    /// Valor bruto atual
    pub fn value(&self) -> Option<String> {
        self.value.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SessionBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self) -> anyhow::Result<Option<String>> {
        let guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        Ok(guard.clone())
    }

    async fn put(&self, value: &str) -> anyhow::Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        *guard = Some(value.to_string());
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SESSION STORE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lista de sessões em memória, persistida a cada mudança.
///
/// Sessões ficam ordenadas da mais recente para a mais antiga.
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    sessions: Vec<ChatSession>,
}

impl SessionStore {
    /// Carrega o histórico do backend.
    ///
    /// Nunca falha: erro de leitura ou de parse resulta em histórico vazio.
    pub async fn load(backend: Arc<dyn SessionBackend>) -> Self {
        let sessions = match backend.get().await {
            Ok(Some(raw)) => parse_sessions(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("⚠ Falha ao ler histórico ({}): {}", backend.name(), e);
                Vec::new()
            }
        };

        log::info!(
            "📚 Histórico carregado: {} sessões ({})",
            sessions.len(),
            backend.name()
        );

        Self { backend, sessions }
    }

    /// Sessões, mais recentes primeiro
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Cria uma sessão nova no topo da lista e persiste.
    ///
    /// Se a gravação falhar, a lista em memória não muda.
    pub async fn create_session(&mut self, first_query: &Query) -> anyhow::Result<String> {
        let session = ChatSession::new(first_query);
        let id = session.id.clone();

        let mut next = Vec::with_capacity(self.sessions.len() + 1);
        next.push(session);
        next.extend(self.sessions.iter().cloned());

        self.commit(next).await?;
        Ok(id)
    }

    /// Anexa mensagens a uma sessão existente e persiste.
    pub async fn append(&mut self, id: &str, messages: Vec<ChatMessage>) -> anyhow::Result<()> {
        let mut next = self.sessions.clone();
        let session = next
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow::anyhow!("sessão {} não encontrada", id))?;
        session.messages.extend(messages);
        self.commit(next).await
    }

    /// Remove uma sessão. Retorna `false` se o id não existia.
    pub async fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next = self.sessions.iter().filter(|s| s.id != id).cloned().collect();
        self.commit(next).await?;
        Ok(true)
    }

    /// Grava a nova lista e só então a adota em memória
    async fn commit(&mut self, next: Vec<ChatSession>) -> anyhow::Result<()> {
        let json = serde_json::to_string(&next)?;
        self.backend.put(&json).await?;
        log::debug!("💾 {} sessões salvas ({})", next.len(), self.backend.name());
        self.sessions = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str) -> Query {
        Query::new(text).unwrap()
    }

    fn temp_history_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("deep-search-test-{}", uuid::Uuid::new_v4()))
            .join("history.json")
    }

    #[test]
    fn test_session_title_truncation() {
        assert_eq!(session_title("o que é   Rust?"), "o que é Rust?");

        let long = "a".repeat(SESSION_TITLE_MAX_CHARS + 10);
        let title = session_title(&long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), SESSION_TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_model_message_from_answer() {
        let answer = AnswerResult {
            text: "texto".into(),
            sources: vec![Source {
                title: "A".into(),
                uri: "https://a.com".into(),
            }],
            related_questions: vec!["1".into(), "2".into(), "3".into()],
            search_results: vec![],
        };

        let message = ChatMessage::model(answer.clone(), Mode::DeepResearch);
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.mode, Some(Mode::DeepResearch));
        assert!(!message.is_error);
        assert_eq!(message.to_answer(), answer);
    }

    #[test]
    fn test_upstream_error_message() {
        let message = ChatMessage::upstream_error(Mode::Fast);
        assert_eq!(message.content, UPSTREAM_ERROR_MESSAGE);
        assert!(message.sources.is_empty());
        assert!(message.is_error);
    }

    #[test]
    fn test_message_json_shape() {
        let message = ChatMessage::user(&query("oi"));
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("sources").is_none());
        assert!(json.get("isError").is_none());
    }

    #[tokio::test]
    async fn test_load_empty_backend() {
        let store = SessionStore::load(Arc::new(MemoryBackend::new())).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupted_history_is_empty() {
        let backend = Arc::new(MemoryBackend::with_value("{not json"));
        let store = SessionStore::load(backend).await;
        assert!(store.is_empty());

        let backend = Arc::new(MemoryBackend::with_value(r#"{"sessions": []}"#));
        let store = SessionStore::load(backend).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_on_change_and_reload() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = SessionStore::load(backend.clone()).await;

        let first = store.create_session(&query("primeira")).await.unwrap();
        let second = store.create_session(&query("segunda")).await.unwrap();
        assert!(backend.value().is_some());

        let q = query("segunda");
        store
            .append(&second, vec![ChatMessage::user(&q), ChatMessage::upstream_error(Mode::Fast)])
            .await
            .unwrap();

        let reloaded = SessionStore::load(backend.clone()).await;
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.sessions()[0].id, second);
        assert_eq!(reloaded.sessions()[1].id, first);
        assert_eq!(reloaded.get(&second).unwrap().messages.len(), 2);
        assert_eq!(reloaded.sessions(), store.sessions());
    }

    #[tokio::test]
    async fn test_append_unknown_session_fails() {
        let mut store = SessionStore::load(Arc::new(MemoryBackend::new())).await;
        let result = store.append("nao-existe", vec![]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = SessionStore::load(backend.clone()).await;
        let id = store.create_session(&query("apagar")).await.unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(SessionStore::load(backend).await.is_empty());
    }

    /// Backend em memória cuja gravação pode ser desligada
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_writes: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl SessionBackend for FlakyBackend {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn get(&self) -> anyhow::Result<Option<String>> {
            self.inner.get().await
        }

        async fn put(&self, value: &str) -> anyhow::Result<()> {
            if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
                anyhow::bail!("disco cheio");
            }
            self.inner.put(value).await
        }
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_unchanged() {
        let backend = Arc::new(FlakyBackend::default());
        let mut store = SessionStore::load(backend.clone()).await;
        let id = store.create_session(&query("primeira")).await.unwrap();
        let saved = backend.inner.value();

        backend
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        assert!(store.create_session(&query("segunda")).await.is_err());
        assert_eq!(store.len(), 1);

        let turn = ChatMessage::user(&query("pergunta"));
        assert!(store.append(&id, vec![turn]).await.is_err());
        assert!(store.get(&id).unwrap().messages.is_empty());

        assert!(store.delete(&id).await.is_err());
        assert!(store.get(&id).is_some());

        assert_eq!(backend.inner.value(), saved);
    }

    #[tokio::test]
    async fn test_local_backend_roundtrip() {
        let path = temp_history_path();
        let backend = LocalBackend::new(path.clone());

        assert_eq!(backend.get().await.unwrap(), None);

        let mut store = SessionStore::load(Arc::new(LocalBackend::new(path.clone()))).await;
        let id = store.create_session(&query("persistida?")).await.unwrap();

        let reloaded = SessionStore::load(Arc::new(backend)).await;
        assert_eq!(reloaded.get(&id).unwrap().title, "persistida?");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
