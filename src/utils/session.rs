//! 会话令牌与 Cookie
//!
//! 令牌是 HS256 签名的 JWT，只携带会话ID、用户ID和角色；
//! 会话是否仍然有效以数据库中的 sessions 记录为准。

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: String,  // 会话ID
    pub sub: String,  // 用户ID
    pub role: String, // 用户角色
    pub exp: i64,     // 过期时间
    pub iat: i64,     // 签发时间
}

impl SessionClaims {
    pub fn new(session_id: &str, user_id: i64, role: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            sid: session_id.to_string(),
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct SessionToken;

impl SessionToken {
    /// 签发令牌
    pub fn issue(
        secret: &str,
        claims: &SessionClaims,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// 校验签名和过期时间，中间件的常规路径
    pub fn verify(secret: &str, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    /// 只校验签名，不校验过期时间。用于登出，以及清理已过期令牌对应的会话
    pub fn verify_signature(
        secret: &str,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

/// 构建会话 Cookie，有效期与会话一致
pub fn build_session_cookie(token: &str, max_age: chrono::Duration) -> Cookie<'static> {
    let config = AppConfig::get();
    Cookie::build(config.session.cookie_name.clone(), token.to_string())
        .path("/")
        .max_age(actix_web::cookie::time::Duration::seconds(
            max_age.num_seconds(),
        ))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(config.is_production()) // 生产环境下使用 HTTPS
        .finish()
}

/// 构建用于清除会话的空 Cookie
pub fn clear_session_cookie() -> Cookie<'static> {
    let config = AppConfig::get();
    Cookie::build(config.session.cookie_name.clone(), "")
        .path("/")
        .max_age(actix_web::cookie::time::Duration::seconds(0))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(config.is_production())
        .finish()
}

/// 从请求中提取令牌：优先 Cookie，其次 `Authorization: Bearer`
pub fn extract_session_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    if let Some(cookie) = req.cookie(cookie_name)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const SECRET: &str = "unit-test-secret-that-is-long-enough";

    #[test]
    fn test_issue_and_verify() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let claims = SessionClaims::new("sid-1", 42, "teacher", expires);
        let token = SessionToken::issue(SECRET, &claims).unwrap();

        let decoded = SessionToken::verify(SECRET, &token).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.user_id(), Some(42));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expires = Utc::now() - chrono::Duration::seconds(5);
        let claims = SessionClaims::new("sid-1", 42, "teacher", expires);
        let token = SessionToken::issue(SECRET, &claims).unwrap();

        let err = SessionToken::verify(SECRET, &token).unwrap_err();
        assert_eq!(
            *err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        );
    }

    #[test]
    fn test_signature_check_still_reads_expired_claims() {
        let expires = Utc::now() - chrono::Duration::minutes(5);
        let claims = SessionClaims::new("sid-9", 7, "parent", expires);
        let token = SessionToken::issue(SECRET, &claims).unwrap();

        let decoded = SessionToken::verify_signature(SECRET, &token).unwrap();
        assert_eq!(decoded.sid, "sid-9");
        assert!(decoded.exp < Utc::now().timestamp());
        assert!(SessionToken::verify_signature("another-secret-that-is-long-enough!!", &token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let claims = SessionClaims::new("sid-1", 42, "admin", expires);
        let token = SessionToken::issue(SECRET, &claims).unwrap();

        assert!(SessionToken::verify("another-secret-that-is-long-enough!!", &token).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let expires = Utc::now() + chrono::Duration::hours(1);
        let claims = SessionClaims::new("sid-1", 42, "student", expires);
        let token = SessionToken::issue(SECRET, &claims).unwrap();

        // 换掉载荷，签名不再匹配
        let forged = SessionClaims::new("sid-1", 42, "admin", expires);
        let forged_token = SessionToken::issue("attacker-secret-attacker-secret-xx", &forged).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_token.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(SessionToken::verify(SECRET, &parts.join(".")).is_err());
    }

    #[test]
    fn test_extract_prefers_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new("session", "from-cookie"))
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(
            extract_session_token(&req, "session").as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn test_extract_falls_back_to_bearer() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(
            extract_session_token(&req, "session").as_deref(),
            Some("from-header")
        );

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert_eq!(extract_session_token(&req, "session"), None);
    }
}
