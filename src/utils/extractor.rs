//! 路径参数提取器
//!
//! 在进入处理函数之前校验路径参数，格式不对时直接返回 400。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 读取正整数ID
fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_request(format!("Invalid path parameter '{name}': {raw}"))),
    }
}

macro_rules! define_safe_id {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id! {
    SafeIDI64 => "id",
    SafeSubjectIdI64 => "subject_id",
}

/// 会话ID，必须是 UUID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeSessionId(pub String);

impl FromRequest for SafeSessionId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("session_id").unwrap_or_default();
        ready(
            uuid::Uuid::parse_str(raw)
                .map(|id| SafeSessionId(id.to_string()))
                .map_err(|_| bad_request(format!("Invalid session id: {raw}"))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive_numbers() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_garbage() {
        for raw in ["0", "-3", "abc", "1; DROP TABLE"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw} should fail");
        }
    }

    #[actix_web::test]
    async fn test_subject_id_uses_its_own_segment() {
        let req = TestRequest::default()
            .param("id", "1")
            .param("subject_id", "7")
            .to_http_request();
        assert_eq!(SafeSubjectIdI64::extract(&req).await.unwrap().0, 7);
    }

    #[actix_web::test]
    async fn test_session_id_must_be_uuid() {
        let id = uuid::Uuid::new_v4().to_string();
        let req = TestRequest::default()
            .param("session_id", id.clone())
            .to_http_request();
        assert_eq!(SafeSessionId::extract(&req).await.unwrap().0, id);

        let req = TestRequest::default()
            .param("session_id", "not-a-uuid")
            .to_http_request();
        assert!(SafeSessionId::extract(&req).await.is_err());
    }
}
