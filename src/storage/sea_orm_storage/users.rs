//! 用户账号存储操作

use super::{SeaOrmStorage, normalize_page};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建用户，password 字段已是哈希值；新账号默认 active
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let created = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolDeskError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(created.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Id.eq(id)))
            .await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Username.eq(username)))
            .await
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Email.eq(email)))
            .await
    }

    /// 登录时按用户名或邮箱查找
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier)),
        )
        .await
    }

    /// 分页列出用户，可按角色、状态筛选并搜索用户名、邮箱、显示名
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::Username, search))
                    .add(like_contains(Column::Email, search))
                    .add(like_contains(Column::DisplayName, search)),
            );
        }
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::Username)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询用户总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询用户页数失败: {e}")))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 部分更新；password 字段已是哈希值
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户；会话级联删除，学生和教师档案上的关联置空
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计用户数量失败: {e}")))
    }

    async fn find_user(&self, condition: Condition) -> Result<Option<User>> {
        let found = Users::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(found.map(|m| m.into_user()))
    }
}
