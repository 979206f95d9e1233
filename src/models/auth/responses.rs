use super::entities::Session;
use crate::models::users::entities::{Permission, User};
use serde::Serialize;
use ts_rs::TS;

// 登录响应（会话令牌通过 Cookie 下发，不出现在响应体中）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub user: User,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub permissions: Vec<Permission>,
}

// 当前会话
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct CurrentSessionResponse {
    pub user: User,
    pub session: Session,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SessionSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub session: Session,
    pub current: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SessionListResponse {
    pub items: Vec<SessionSummary>,
}
