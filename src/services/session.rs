// src/services/session.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::auth::SessionUser;

/// Sessão aberta por login (senha ou Google).
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user: SessionUser,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// Guarda global de sessões. Só login/OAuth escrevem; logout remove.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, user: SessionUser, ttl: chrono::Duration) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user,
            created_at: now,
            expires_at: now + ttl,
        };

        let mut sessions = self.sessions.write().await;
        // Aproveita a escrita para descartar sessões vencidas
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|s| !s.is_expired(Utc::now()))
            .cloned()
    }

    pub async fn close(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Remove todas as sessões de uma conta (conta desativada ou excluída).
    pub async fn close_for_account(&self, account_id: Uuid) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user.id != Some(account_id));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
