//! 教师存储操作

use super::{SeaOrmStorage, normalize_page};
use crate::entity::class_subjects::{Column as ClassSubjectColumn, Entity as ClassSubjects};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::entity::format_date;
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::{TeacherClassesResponse, TeacherListResponse},
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            employee_no: Set(req.employee_no),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            email: Set(req.email),
            phone: Set(req.phone),
            gender: Set(req.gender.to_string()),
            address: Set(req.address),
            hired_on: Set(format_date(req.hired_on)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建教师失败: {e}")))?;

        Ok(result.into_teacher())
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_employee_no_impl(
        &self,
        employee_no: &str,
    ) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::EmployeeNo.eq(employee_no))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 分页列出教师，按姓名、工号、邮箱搜索
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Teachers::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::FirstName, search))
                    .add(like_contains(Column::LastName, search))
                    .add(like_contains(Column::EmployeeNo, search))
                    .add(like_contains(Column::Email, search)),
            );
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师页数失败: {e}")))?;
        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(TeacherListResponse {
            items: teachers.into_iter().map(|m| m.into_teacher()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        if self.get_teacher_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if update.hired_on.is_some() {
            model.hired_on = Set(format_date(update.hired_on));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新教师失败: {e}")))?;

        self.get_teacher_by_id_impl(id).await
    }

    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 教师担任班主任的班级和任课安排
    pub async fn list_teacher_classes_impl(
        &self,
        teacher_id: i64,
    ) -> Result<TeacherClassesResponse> {
        let supervised = Classes::find()
            .filter(ClassColumn::SupervisorId.eq(teacher_id))
            .order_by_asc(ClassColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?;

        let assignments = ClassSubjects::find()
            .filter(ClassSubjectColumn::TeacherId.eq(teacher_id))
            .order_by_asc(ClassSubjectColumn::ClassId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询任课安排失败: {e}")))?;

        Ok(TeacherClassesResponse {
            supervised: supervised.into_iter().map(|m| m.into_class()).collect(),
            teaching: self.hydrate_class_subjects(assignments).await?,
        })
    }

    pub async fn count_teachers_impl(&self) -> Result<u64> {
        Teachers::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计教师数量失败: {e}")))
    }

    /// 批量查询教师姓名
    pub(super) async fn teacher_names(
        &self,
        ids: Vec<i64>,
    ) -> Result<std::collections::HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(Default::default());
        }

        let teachers = Teachers::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(teachers
            .into_iter()
            .map(|t| (t.id, t.full_name()))
            .collect())
    }
}
