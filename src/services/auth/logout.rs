use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, warn};

use crate::middlewares::RequireSession;
use crate::models::ApiResponse;
use crate::services::get_cache;
use crate::utils::session::{SessionToken, clear_session_cookie, extract_session_token};

use super::AuthService;

/// 处理用户登出
///
/// 无论令牌是否有效都返回成功并清除 Cookie；令牌签名有效时删除对应会话。
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    if let Some(token) = extract_session_token(request, &config.session.cookie_name) {
        match SessionToken::verify_signature(&config.session.secret, &token) {
            Ok(claims) => {
                let storage = service.get_storage(request);
                if let Err(e) = storage.delete_session(&claims.sid).await {
                    warn!("Failed to delete session {} on logout: {}", claims.sid, e);
                }
                RequireSession::evict_sessions(&get_cache(request), &[claims.sid]).await;
            }
            Err(e) => debug!("Ignoring invalid token on logout: {}", e),
        }
    }

    Ok(HttpResponse::Ok()
        .cookie(clear_session_cookie())
        .json(ApiResponse::<()>::success_empty("登出成功")))
}
