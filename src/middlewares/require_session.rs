/*!
 * 会话认证中间件
 *
 * 校验会话 Cookie（或 `Authorization: Bearer`）中的签名令牌，并确认令牌对应的
 * 会话记录仍然存在且未过期。只有经过身份验证的用户才能访问受保护的路由。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireSession;
 *
 * web::scope("/api/v1/students")
 *     .wrap(RequireSession)
 *     .route("", web::get().to(list_students));
 * ```
 *
 * 处理程序中通过 `RequireSession::extract_user(&req)` 取得当前用户，
 * `RequireSession::extract_session(&req)` 取得当前会话。
 *
 * ## 认证流程
 *
 * 1. 从 Cookie 或请求头提取令牌并校验签名
 * 2. 令牌已过期时删除对应会话记录
 * 3. 先查缓存，再查数据库，会话必须存在、属于令牌中的用户且未过期
 * 4. 用户必须存在且处于 active 状态
 * 5. 任一步失败返回 401 并清除 Cookie
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::auth::entities::Session;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::models::ErrorCode;
use crate::storage::Storage;
use crate::utils::session::{SessionToken, clear_session_cookie, extract_session_token};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireSession;

/// 缓存中的会话及其用户
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSession {
    session: Session,
    user: User,
}

/// 认证失败的原因
#[derive(Debug)]
enum SessionFailure {
    Missing,
    Invalid(String),
    Expired,
    Inactive,
    Internal(String),
}

impl SessionFailure {
    fn code(&self) -> ErrorCode {
        match self {
            SessionFailure::Expired => ErrorCode::SessionExpired,
            SessionFailure::Inactive => ErrorCode::AccountInactive,
            _ => ErrorCode::Unauthorized,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionFailure::Missing => "Authentication required".to_string(),
            SessionFailure::Invalid(reason) => format!("Unauthorized: {reason}"),
            SessionFailure::Expired => "Session expired, please sign in again".to_string(),
            SessionFailure::Inactive => "Account is not active".to_string(),
            SessionFailure::Internal(reason) => format!("Unauthorized: {reason}"),
        }
    }
}

pub fn session_cache_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

fn get_cache(req: &ServiceRequest) -> Arc<dyn ObjectCache> {
    req.app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}

fn get_storage(req: &ServiceRequest) -> Arc<dyn Storage> {
    req.app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 删除已过期的会话记录并清理缓存
async fn discard_session(storage: &Arc<dyn Storage>, cache: &Arc<dyn ObjectCache>, sid: &str) {
    cache.remove(&session_cache_key(sid)).await;
    if let Err(e) = storage.delete_session(sid).await {
        warn!("Failed to delete expired session {}: {}", sid, e);
    }
}

async fn validate_session(req: &ServiceRequest) -> Result<(User, Session), SessionFailure> {
    let config = AppConfig::get();
    let token = extract_session_token(req.request(), &config.session.cookie_name)
        .ok_or(SessionFailure::Missing)?;

    let storage = get_storage(req);
    let cache = get_cache(req);
    let now = chrono::Utc::now();

    let claims = match SessionToken::verify(&config.session.secret, &token) {
        Ok(claims) => claims,
        Err(err) if *err.kind() == ErrorKind::ExpiredSignature => {
            // 令牌过期但签名有效，清理对应的会话记录
            if let Ok(expired) = SessionToken::verify_signature(&config.session.secret, &token) {
                discard_session(&storage, &cache, &expired.sid).await;
            }
            return Err(SessionFailure::Expired);
        }
        Err(err) => {
            info!("Session token validation failed: {}", err);
            return Err(SessionFailure::Invalid("invalid session token".to_string()));
        }
    };

    let user_id = claims
        .user_id()
        .ok_or_else(|| SessionFailure::Invalid("invalid user id in token".to_string()))?;

    let cache_key = session_cache_key(&claims.sid);
    let (session, user) = match cache.get::<CachedSession>(&cache_key).await {
        CacheResult::Found(cached) => (cached.session, cached.user),
        _ => {
            debug!("Session {} not found in cache", claims.sid);
            let session = storage
                .get_session(&claims.sid)
                .await
                .map_err(|e| SessionFailure::Internal(e.to_string()))?
                .ok_or_else(|| SessionFailure::Invalid("session not found".to_string()))?;
            let user = storage
                .get_user_by_id(session.user_id)
                .await
                .map_err(|e| SessionFailure::Internal(e.to_string()))?
                .ok_or_else(|| SessionFailure::Invalid("user not found".to_string()))?;
            (session, user)
        }
    };

    if session.user_id != user_id || user.id != user_id {
        return Err(SessionFailure::Invalid("session does not match token".to_string()));
    }

    if session.is_expired_at(now) {
        discard_session(&storage, &cache, &session.id).await;
        return Err(SessionFailure::Expired);
    }

    if user.status != UserStatus::Active {
        cache.remove(&cache_key).await;
        return Err(SessionFailure::Inactive);
    }

    // 缓存时间不超过会话剩余有效期
    let remaining = (session.expires_at - now).num_seconds().max(1) as u64;
    let ttl = config.cache.default_ttl.min(remaining);
    cache
        .insert(
            cache_key,
            &CachedSession {
                session: session.clone(),
                user: user.clone(),
            },
            ttl,
        )
        .await;

    Ok((user, session))
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match validate_session(&req).await {
                Ok((user, session)) => {
                    debug!("Session authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(session);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    info!(
                        "Session authentication failed for request to {}: {:?}",
                        req.path(),
                        failure
                    );
                    let mut response = create_error_response(
                        StatusCode::UNAUTHORIZED,
                        failure.code(),
                        &failure.message(),
                    );
                    if let Err(e) = response.add_cookie(&clear_session_cookie()) {
                        warn!("Failed to attach cookie removal: {}", e);
                    }
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireSession {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireSession中间件的路由处理程序中使用
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role.clone())
    }

    /// 从请求扩展中提取当前会话
    pub fn extract_session(req: &HttpRequest) -> Option<Session> {
        req.extensions().get::<Session>().cloned()
    }

    /// 会话被删除后清理对应缓存
    pub async fn evict_sessions(cache: &Arc<dyn ObjectCache>, session_ids: &[String]) {
        for id in session_ids {
            cache.remove(&session_cache_key(id)).await;
        }
    }
}
