use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::middlewares::RequireSession;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode, auth::ChangePasswordRequest};
use crate::services::{bad_request, current_user, get_cache, internal_error, not_found};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

/// 修改密码，成功后注销该用户的其他会话
pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 缓存中的用户不带密码哈希，从存储重新读取
    let user = match storage.get_user_by_id(current.id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(internal_error("Failed to load user", e)),
    };

    if !verify_password(&change_request.old_password, &user.password_hash) {
        return Ok(bad_request(
            ErrorCode::PasswordMismatch,
            "Old password is incorrect",
        ));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let hash = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    if let Err(e) = storage
        .update_user(
            user.id,
            UpdateUserRequest {
                password: Some(hash),
                ..Default::default()
            },
        )
        .await
    {
        return Ok(internal_error("Failed to update password", e));
    }

    let keep = RequireSession::extract_session(request).map(|s| s.id);
    match storage.delete_user_sessions(user.id, keep.as_deref()).await {
        Ok(revoked) => {
            RequireSession::evict_sessions(&get_cache(request), &revoked).await;
            info!(
                "User {} changed password, {} other sessions revoked",
                user.id,
                revoked.len()
            );
        }
        Err(e) => return Ok(internal_error("Failed to revoke other sessions", e)),
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Password changed successfully",
    )))
}
