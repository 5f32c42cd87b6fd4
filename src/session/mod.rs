//! Session lifecycle
//!
//! The server holds at most one logged-in messenger user. Authenticating
//! again logs out and destroys the previous session before the new one is
//! opened.

mod active;

pub use active::{ActiveSession, ChatCacheSettings};

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::errors::{ChatcasterError, Result};
use crate::messenger::{Credentials, MessengerConnector, MessengerUser};

pub struct SessionManager {
    connector: Arc<dyn MessengerConnector>,
    cache_settings: ChatCacheSettings,
    current: RwLock<Option<Arc<ActiveSession>>>,
    /// Serialises authenticate/log_out so two logins never interleave
    switch_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn MessengerConnector>, cache_settings: ChatCacheSettings) -> Self {
        Self {
            connector,
            cache_settings,
            current: RwLock::new(None),
            switch_lock: Mutex::new(()),
        }
    }

    /// Replace the active session with one for `credentials`
    ///
    /// The previous session is ended first; if the new login fails no
    /// session is active afterwards.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<MessengerUser> {
        validate_credentials(credentials)?;

        let _switch = self.switch_lock.lock().await;

        // guard dropped here; end() may take seconds
        let previous = self.current.write().await.take();
        if let Some(previous) = previous {
            info!("Destroying last session ({})", previous.phone_number());
            previous.end().await;
        }

        info!("Now connecting with {}", credentials.phone_number);
        let session = self.connector.connect(credentials).await?;
        let active = Arc::new(ActiveSession::new(
            credentials.phone_number.clone(),
            session,
            &self.cache_settings,
        ));

        let user = match active.user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    "Connected as {} but failed to load the user profile: {}",
                    credentials.phone_number, e
                );
                active.end().await;
                return Err(e);
            }
        };

        *self.current.write().await = Some(active);
        info!(
            "Logged in as {} ({})",
            user.first_name, credentials.phone_number
        );
        Ok(user)
    }

    /// The active session, or `NotConnected`
    pub async fn current(&self) -> Result<Arc<ActiveSession>> {
        self.current
            .read()
            .await
            .clone()
            .ok_or_else(|| ChatcasterError::not_connected("Not connected"))
    }

    pub async fn is_connected(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// End the active session; returns whether one existed
    pub async fn log_out(&self) -> bool {
        let _switch = self.switch_lock.lock().await;

        let current = self.current.write().await.take();
        match current {
            Some(session) => {
                info!("Logging out {}", session.phone_number());
                session.end().await;
                true
            }
            None => false,
        }
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<()> {
    if credentials.phone_number.trim().is_empty() {
        return Err(ChatcasterError::validation("phoneNumber is required"));
    }
    if credentials.code.trim().is_empty() {
        return Err(ChatcasterError::validation("code is required"));
    }
    Ok(())
}
