use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::UserService;
use crate::middlewares::RequireSession;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, conflict, get_cache, internal_error, not_found};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(email) = update_data.email.take() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        match storage.get_user_by_email(&email).await {
            Ok(Some(other)) if other.id != user_id => {
                return Ok(conflict(ErrorCode::UserAlreadyExists, "Email already exists"));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to update user information", e)),
        }
        update_data.email = Some(email);
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(internal_error("Password hashing failed", e)),
        }
    }

    let revoke = update_data.invalidates_sessions();

    let user = match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(internal_error("Failed to update user information", e)),
    };

    // 密码、角色或状态变化后，该用户已有的会话全部失效
    if revoke {
        match storage.delete_user_sessions(user_id, None).await {
            Ok(revoked) => {
                RequireSession::evict_sessions(&get_cache(request), &revoked).await;
                info!("Revoked {} sessions of user {}", revoked.len(), user_id);
            }
            Err(e) => return Ok(internal_error("Failed to revoke user sessions", e)),
        }
    } else {
        // 会话缓存里带着用户资料，更新后需要重新加载
        match storage.list_user_sessions(user_id).await {
            Ok(sessions) => {
                let ids: Vec<String> = sessions.into_iter().map(|s| s.id).collect();
                RequireSession::evict_sessions(&get_cache(request), &ids).await;
            }
            Err(e) => warn!("Failed to refresh cached sessions of user {}: {}", user_id, e),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User information updated successfully",
    )))
}
