// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONVERSA - shaper + histórico
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Lado do chamador: cada pergunta vira um turno do usuário + um turno do
// modelo na sessão atual. Falha do serviço vira um turno fixo de erro.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::history::{ChatMessage, ChatSession, SessionStore};
use crate::shaper::ResponseShaper;
use crate::types::{Mode, Query};

/// Thread de conversa ativa sobre um `SessionStore`.
pub struct Conversation {
    shaper: ResponseShaper,
    store: SessionStore,
    current: Option<String>,
}

impl Conversation {
    pub fn new(shaper: ResponseShaper, store: SessionStore) -> Self {
        Self {
            shaper,
            store,
            current: None,
        }
    }

    /// Faz uma pergunta na sessão atual (criando uma se necessário).
    ///
    /// Retorna a mensagem do modelo que foi anexada. Erros aqui são apenas de
    /// query inválida ou de persistência; falha do serviço vira mensagem de erro.
    pub async fn ask(&mut self, text: &str, mode: Mode) -> anyhow::Result<ChatMessage> {
        let query = Query::new(text)?;

        let session_id = match self.current_session().map(|s| s.id.clone()) {
            Some(id) => id,
            None => {
                let id = self.store.create_session(&query).await?;
                self.current = Some(id.clone());
                id
            }
        };

        let reply = match self.shaper.shape(&query, mode).await {
            Ok(result) => ChatMessage::model(result, mode),
            Err(e) => {
                log::error!("✗ Pergunta falhou: {}", e);
                ChatMessage::upstream_error(mode)
            }
        };

        self.store
            .append(&session_id, vec![ChatMessage::user(&query), reply.clone()])
            .await?;

        Ok(reply)
    }

    /// Próxima pergunta vai abrir uma sessão nova
    pub fn new_thread(&mut self) {
        self.current = None;
    }

    /// Seleciona uma sessão existente. Retorna `false` se o id não existe.
    pub fn select(&mut self, id: &str) -> bool {
        if self.store.get(id).is_some() {
            self.current = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Remove uma sessão; se era a atual, a próxima pergunta abre outra.
    pub async fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        let removed = self.store.delete(id).await?;
        if removed && self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Ok(removed)
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        self.current.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
