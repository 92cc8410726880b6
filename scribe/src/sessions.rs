use std::collections::HashMap;
use std::sync::Arc;

use narrative::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Independent sessions keyed by id. Nothing is shared between them.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, Arc<Session>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Session::new());
        self.sessions.write().await.insert(id, session.clone());
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drop a session and its draft. Returns the session if it existed.
    pub async fn remove(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
