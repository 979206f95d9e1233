use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, conflict, internal_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    // 验证用户名
    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    // 验证密码策略
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let storage = service.get_storage(request);

    // 用户名和邮箱都必须唯一
    match storage.get_user_by_username(&user_data.username).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::UserAlreadyExists,
                "Username already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("User creation failed", e)),
    }
    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::UserAlreadyExists, "Email already exists"));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("User creation failed", e)),
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "用户创建成功")))
        }
        Err(e) => Ok(internal_error("User creation failed", e)),
    }
}
