//! In-memory driver state. Nothing here outlives the process.

mod feed;

pub use feed::{FixtureRideFeed, RideFeed};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::driver::DriverSession;

/// Driver sessions keyed by driver id. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct DriverStore {
    sessions: Arc<RwLock<HashMap<Uuid, DriverSession>>>,
}

impl DriverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a driver's session, or a fresh offline session if the driver
    /// has not been seen yet.
    pub async fn snapshot(&self, driver_id: Uuid) -> DriverSession {
        self.sessions
            .read()
            .await
            .get(&driver_id)
            .cloned()
            .unwrap_or_else(|| DriverSession::new(driver_id))
    }

    /// Runs `f` against a working copy of the driver's session under the
    /// write lock. The copy is stored only when `f` succeeds, so a failed
    /// update neither changes an existing session nor creates a new one.
    pub async fn update<F, T, E>(&self, driver_id: Uuid, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut DriverSession) -> Result<T, E>,
    {
        let mut sessions = self.sessions.write().await;
        let mut session = sessions
            .get(&driver_id)
            .cloned()
            .unwrap_or_else(|| DriverSession::new(driver_id));

        let result = f(&mut session)?;

        if sessions.insert(driver_id, session).is_none() {
            tracing::debug!(%driver_id, "Created driver session");
        }
        Ok(result)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
