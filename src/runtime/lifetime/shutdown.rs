use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::session::SessionManager;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Wait for Ctrl+C, then end the active messenger session
pub async fn listen_for_shutdown(sessions: Arc<SessionManager>) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing messenger session...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    perform_shutdown_tasks(&sessions).await;
}

/// 执行所有关闭任务（在超时内调用）
pub async fn perform_shutdown_tasks(sessions: &SessionManager) {
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), sessions.log_out()).await {
        Ok(true) => info!("Active session logged out"),
        Ok(false) => info!("No active session, nothing to log out"),
        Err(_) => error!(
            "Session log out timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}
