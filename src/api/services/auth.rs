//! Login, logout and current user

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::{info, trace};

use crate::messenger::Credentials;
use crate::session::SessionManager;

use super::helpers::{api_result, error_response, success_response};
use super::types::{AuthRequest, LogoutResponse, UserResponse};

/// POST /auth
pub async fn authenticate(
    body: web::Json<AuthRequest>,
    sessions: web::Data<Arc<SessionManager>>,
) -> HttpResponse {
    let body = body.into_inner();
    let credentials = Credentials::new(body.phone_number.trim(), body.code.trim());
    info!("API: authentication request for {}", credentials.phone_number);

    api_result(
        sessions
            .authenticate(&credentials)
            .await
            .map(UserResponse::from),
    )
}

/// POST /logout
pub async fn logout(sessions: web::Data<Arc<SessionManager>>) -> HttpResponse {
    let logged_out = sessions.log_out().await;
    success_response(LogoutResponse { logged_out })
}

/// GET /getCurrentUser
pub async fn get_current_user(sessions: web::Data<Arc<SessionManager>>) -> HttpResponse {
    trace!("API: current user request");

    let session = match sessions.current().await {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };

    api_result(session.user().await.map(UserResponse::from))
}
