//! Session store service

use std::collections::HashMap;
use std::sync::Arc;

use chat_core::ChatMessage;
use tokio::sync::RwLock;

type SessionLog = Arc<RwLock<Vec<ChatMessage>>>;

/// In-process store of per-session conversation logs.
///
/// Each session owns its own lock: appending one exchange is atomic per
/// session key, so two turns racing on the same session interleave whole
/// exchanges instead of overwriting each other's history.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionLog>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn log(&self, session_key: &str) -> Option<SessionLog> {
        self.sessions.read().await.get(session_key).cloned()
    }

    async fn log_or_create(&self, session_key: &str) -> SessionLog {
        if let Some(log) = self.log(session_key).await {
            return log;
        }
        let mut sessions = self.sessions.write().await;
        sessions.entry(session_key.to_string()).or_default().clone()
    }

    /// Snapshot of the session's history, oldest turn first.
    /// Unknown keys read as an empty history.
    pub async fn get(&self, session_key: &str) -> Vec<ChatMessage> {
        match self.log(session_key).await {
            Some(log) => log.read().await.clone(),
            None => Vec::new(),
        }
    }

    /// Append a single turn to the tail of the session's log.
    pub async fn append(&self, session_key: &str, message: ChatMessage) {
        let log = self.log_or_create(session_key).await;
        log.write().await.push(message);
    }

    /// Append one completed exchange (user turn, then assistant turn) under
    /// the session's lock.
    pub async fn commit_exchange(
        &self,
        session_key: &str,
        user: ChatMessage,
        assistant: ChatMessage,
    ) {
        let log = self.log_or_create(session_key).await;
        let mut log = log.write().await;
        log.push(user);
        log.push(assistant);
        tracing::debug!(
            session_key = %session_key,
            history_len = log.len(),
            "committed exchange"
        );
    }

    /// Remove the session's log entirely. A no-op for unknown keys.
    pub async fn clear(&self, session_key: &str) {
        let removed = self.sessions.write().await.remove(session_key).is_some();
        tracing::debug!(session_key = %session_key, removed, "cleared session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_unknown_session_is_empty() {
        let store = SessionStore::new();
        assert!(store.get("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = SessionStore::new();
        store.append("a", ChatMessage::user("one")).await;
        store.append("a", ChatMessage::assistant("two")).await;
        store.append("a", ChatMessage::user("three")).await;

        let log = store.get("a").await;
        let texts: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.append("a", ChatMessage::user("for a")).await;
        store.append("b", ChatMessage::user("for b")).await;

        assert_eq!(store.get("a").await.len(), 1);
        assert_eq!(store.get("b").await.len(), 1);
        assert_eq!(store.get("a").await[0].content, "for a");
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = SessionStore::new();
        store.clear("a").await;
        assert!(store.get("a").await.is_empty());

        store.append("a", ChatMessage::user("hello")).await;
        store.clear("a").await;
        store.clear("a").await;
        assert!(store.get("a").await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_commits_never_lose_an_exchange() {
        let store = Arc::new(SessionStore::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .commit_exchange(
                        "shared",
                        ChatMessage::user(format!("q{i}")),
                        ChatMessage::assistant(format!("r{i}")),
                    )
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let log = store.get("shared").await;
        assert_eq!(log.len(), 16);
        // Exchanges interleave as whole pairs: every user turn is directly
        // followed by its own assistant turn.
        for pair in log.chunks(2) {
            assert_eq!(pair[0].content[1..], pair[1].content[1..]);
            assert_eq!(pair[0].role, chat_core::Role::User);
            assert_eq!(pair[1].role, chat_core::Role::Assistant);
        }
    }
}
