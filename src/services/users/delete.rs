use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::RequireSession;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, get_cache, internal_error, not_found};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 禁止删除当前用户
    if RequireSession::extract_user_id(request) == Some(user_id) {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    // 会话行随外键级联删除，缓存需要手动清理
    let sessions = match storage.list_user_sessions(user_id).await {
        Ok(sessions) => sessions.into_iter().map(|s| s.id).collect::<Vec<_>>(),
        Err(e) => return Ok(internal_error("User deletion failed", e)),
    };

    match storage.delete_user(user_id).await {
        Ok(true) => {
            RequireSession::evict_sessions(&get_cache(request), &sessions).await;
            info!("User {} deleted", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(internal_error("User deletion failed", e)),
    }
}
