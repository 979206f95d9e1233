pub mod login;
pub mod logout;
pub mod password;
pub mod session;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::auth::{ChangePasswordRequest, LoginRequest};

define_service!(AuthService);

impl AuthService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 当前会话
    pub async fn current_session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        session::handle_current_session(request).await
    }

    // 当前用户的全部会话
    pub async fn list_sessions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        session::handle_list_sessions(self, request).await
    }

    // 注销指定会话
    pub async fn revoke_session(
        &self,
        session_id: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        session::handle_revoke_session(self, session_id, request).await
    }

    // 修改密码
    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, change_request, request).await
    }
}
