use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{ChangePasswordRequest, LoginRequest};
use crate::services::AuthService;
use crate::utils::SafeSessionId;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn current_session(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.current_session(&req).await
}

pub async fn list_sessions(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.list_sessions(&req).await
}

pub async fn revoke_session(
    req: HttpRequest,
    session_id: SafeSessionId,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.revoke_session(session_id.0, &req).await
}

pub async fn change_password(
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.change_password(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route(
                "/login",
                web::post()
                    .to(login)
                    .wrap(middlewares::RateLimit::login()),
            )
            // 登出不要求会话有效，令牌失效时也能清除 Cookie
            .route("/logout", web::post().to(logout))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireSession)
                    .route("/session", web::get().to(current_session))
                    .route("/sessions", web::get().to(list_sessions))
                    .route("/sessions/{session_id}", web::delete().to(revoke_session))
                    .route(
                        "/password",
                        web::put()
                            .to(change_password)
                            .wrap(middlewares::RateLimit::change_password()),
                    ),
            ),
    );
}
