use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireSession;
use crate::models::auth::responses::SessionSummary;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{CurrentSessionResponse, SessionListResponse},
};
use crate::services::{current_user, get_cache, internal_error, not_found};
use crate::utils::session::clear_session_cookie;

use super::AuthService;

pub async fn handle_current_session(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let Some(session) = RequireSession::extract_session(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    let permissions = user.role.permissions().to_vec();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CurrentSessionResponse {
            user,
            session,
            permissions,
        },
        "ok",
    )))
}

pub async fn handle_list_sessions(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let current_id = RequireSession::extract_session(request).map(|s| s.id);

    let storage = service.get_storage(request);
    match storage.list_user_sessions(user.id).await {
        Ok(sessions) => {
            let items = sessions
                .into_iter()
                .map(|session| SessionSummary {
                    current: current_id.as_deref() == Some(session.id.as_str()),
                    session,
                })
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(SessionListResponse { items }, "ok")))
        }
        Err(e) => Ok(internal_error("Failed to list sessions", e)),
    }
}

/// 用户只能注销自己的会话，其他用户的会话一律视为不存在
pub async fn handle_revoke_session(
    service: &AuthService,
    session_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.get_session(&session_id).await {
        Ok(Some(session)) if session.user_id == user.id => {}
        Ok(_) => return Ok(not_found(ErrorCode::NotFound, "Session not found")),
        Err(e) => return Ok(internal_error("Failed to load session", e)),
    }

    if let Err(e) = storage.delete_session(&session_id).await {
        return Ok(internal_error("Failed to revoke session", e));
    }
    RequireSession::evict_sessions(&get_cache(request), std::slice::from_ref(&session_id)).await;

    let is_current =
        RequireSession::extract_session(request).is_some_and(|current| current.id == session_id);
    let mut response = HttpResponse::Ok();
    if is_current {
        response.cookie(clear_session_cookie());
    }
    Ok(response.json(ApiResponse::<()>::success_empty("Session revoked")))
}
