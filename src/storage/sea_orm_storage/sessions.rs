//! 登录会话存储操作

use super::SeaOrmStorage;
use crate::entity::sessions::{ActiveModel, Column, Entity as Sessions};
use crate::errors::{Result, SchoolDeskError};
use crate::models::auth::entities::{NewSession, Session};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

impl SeaOrmStorage {
    pub async fn create_session_impl(&self, session: NewSession) -> Result<Session> {
        let model = ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            remember_me: Set(session.remember_me),
            ip_address: Set(session.ip_address),
            user_agent: Set(session.user_agent),
            expires_at: Set(session.expires_at.timestamp()),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建会话失败: {e}")))?;

        Ok(result.into_session())
    }

    pub async fn get_session_impl(&self, session_id: &str) -> Result<Option<Session>> {
        let result = Sessions::find_by_id(session_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 列出用户未过期的会话，最新的在前
    pub async fn list_user_sessions_impl(&self, user_id: i64) -> Result<Vec<Session>> {
        let now = chrono::Utc::now().timestamp();

        let sessions = Sessions::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ExpiresAt.gt(now))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询会话列表失败: {e}")))?;

        Ok(sessions.into_iter().map(|m| m.into_session()).collect())
    }

    pub async fn delete_session_impl(&self, session_id: &str) -> Result<bool> {
        let result = Sessions::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除会话失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除用户的会话，返回被删除的会话ID（用于清理缓存）
    pub async fn delete_user_sessions_impl(
        &self,
        user_id: i64,
        keep: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut select = Sessions::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::UserId.eq(user_id));
        if let Some(keep) = keep {
            select = select.filter(Column::Id.ne(keep));
        }

        let ids: Vec<String> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询会话列表失败: {e}")))?;

        if ids.is_empty() {
            return Ok(ids);
        }

        Sessions::delete_many()
            .filter(Column::Id.is_in(ids.clone()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除会话失败: {e}")))?;

        Ok(ids)
    }

    /// 清理所有已过期的会话
    pub async fn purge_expired_sessions_impl(&self) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();

        let result = Sessions::delete_many()
            .filter(Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("清理过期会话失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
