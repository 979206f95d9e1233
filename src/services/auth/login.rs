use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::models::auth::entities::NewSession;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::internal_error;
use crate::utils::password::verify_login_password;
use crate::utils::session::{SessionClaims, SessionToken, build_session_cookie};

use super::AuthService;

// 两种失败使用同一条提示，不暴露账号是否存在
const AUTH_FAILED_MESSAGE: &str = "Username or password is incorrect";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(user) => user,
        Err(e) => return Ok(internal_error("Login failed", e)),
    };

    // 2. 验证密码
    let password_ok = verify_login_password(
        &login_request.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    );
    let user = match user {
        Some(user) if password_ok => user,
        _ => {
            info!("Failed login attempt for '{}'", login_request.username);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                AUTH_FAILED_MESSAGE,
            )));
        }
    };

    // 3. 只有 active 用户可以登录
    if !user.is_active() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is not active",
        )));
    }

    // 4. 创建会话记录
    let lifetime = if login_request.remember_me {
        chrono::Duration::days(config.session.remember_me_ttl_days)
    } else {
        chrono::Duration::hours(config.session.ttl_hours)
    };
    let expires_at = chrono::Utc::now() + lifetime;

    let session = match storage
        .create_session(NewSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id,
            remember_me: login_request.remember_me,
            ip_address: request
                .connection_info()
                .realip_remote_addr()
                .map(|s| s.to_string()),
            user_agent: request
                .headers()
                .get(actix_web::http::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.chars().take(255).collect()),
            expires_at,
        })
        .await
    {
        Ok(session) => session,
        Err(e) => return Ok(internal_error("Login failed, unable to create session", e)),
    };

    // 5. 签发令牌
    let claims = SessionClaims::new(
        &session.id,
        user.id,
        &user.role.to_string(),
        session.expires_at,
    );
    let token = match SessionToken::issue(&config.session.secret, &claims) {
        Ok(token) => token,
        Err(e) => {
            if let Err(err) = storage.delete_session(&session.id).await {
                warn!("Failed to remove unsigned session {}: {}", session.id, err);
            }
            return Ok(internal_error("Login failed, unable to sign session", e));
        }
    };

    // 6. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    info!("User {} logged in successfully", user.username);

    let cookie = build_session_cookie(&token, session.expires_at - chrono::Utc::now());
    let permissions = user.role.permissions().to_vec();
    let response = LoginResponse {
        user,
        expires_at: session.expires_at,
        permissions,
    };

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
