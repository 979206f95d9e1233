//! 学生存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, normalize_page};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::students::{ActiveModel, Column, Entity as Students, Model as StudentModel};
use crate::entity::format_date;
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    common::Gender,
    dashboard::responses::GenderCount,
    students::{
        entities::{Student, StudentStatus, StudentWithClass},
        requests::{CreateStudentRequest, StudentListQuery, StudentScope, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

/// 按可见范围过滤学生
pub(super) fn scope_students(select: Select<Students>, scope: &StudentScope) -> Select<Students> {
    match scope {
        StudentScope::All => select,
        StudentScope::SelfUser(user_id) => select.filter(Column::UserId.eq(*user_id)),
        StudentScope::ParentOf(user_id) => select.filter(Column::ParentId.eq(*user_id)),
    }
}

fn filtered_students(query: &StudentListQuery) -> Select<Students> {
    let mut select = scope_students(Students::find(), &query.scope);

    if let Some(class_id) = query.class_id {
        select = select.filter(Column::ClassId.eq(class_id));
    }

    if let Some(status) = query.status {
        select = select.filter(Column::Status.eq(status.to_string()));
    }

    if let Some(ref search) = query.search
        && !search.trim().is_empty()
    {
        let search = search.trim();
        select = select.filter(
            Condition::any()
                .add(like_contains(Column::FirstName, search))
                .add(like_contains(Column::LastName, search))
                .add(like_contains(Column::AdmissionNo, search))
                .add(like_contains(Column::GuardianName, search)),
        );
    }

    select
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .order_by_asc(Column::Id)
}

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            parent_id: Set(req.parent_id),
            class_id: Set(req.class_id),
            admission_no: Set(req.admission_no),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            gender: Set(req.gender.to_string()),
            birthday: Set(format_date(req.birthday)),
            guardian_name: Set(req.guardian_name),
            guardian_phone: Set(req.guardian_phone),
            address: Set(req.address),
            status: Set(StudentStatus::Active.to_string()),
            enrolled_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<StudentWithClass>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;

        match result {
            Some(model) => Ok(self.with_class_names(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_student_by_admission_no_impl(
        &self,
        admission_no: &str,
    ) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::AdmissionNo.eq(admission_no))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let paginator = filtered_students(&query).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生页数失败: {e}")))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: self.with_class_names(students).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_students_for_export_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<Vec<StudentWithClass>> {
        let students = filtered_students(&query)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生列表失败: {e}")))?;

        self.with_class_names(students).await
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?
            .is_none()
        {
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
        if let Some(parent_id) = update.parent_id {
            model.parent_id = Set(Some(parent_id));
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if update.birthday.is_some() {
            model.birthday = Set(format_date(update.birthday));
        }
        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = update.guardian_phone {
            model.guardian_phone = Set(Some(guardian_phone));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新学生失败: {e}")))?;

        Ok(Some(updated.into_student()))
    }

    /// 删除学生，成绩和收费随外键级联删除
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_students_impl(&self) -> Result<u64> {
        Students::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计学生数量失败: {e}")))
    }

    /// 按性别分组统计学生人数
    pub async fn count_students_by_gender_impl(&self) -> Result<Vec<GenderCount>> {
        let rows: Vec<(String, i64)> = Students::find()
            .select_only()
            .column(Column::Gender)
            .column_as(Column::Id.count(), "student_count")
            .group_by(Column::Gender)
            .order_by_asc(Column::Gender)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计学生性别失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(gender, count)| GenderCount {
                gender: gender.parse::<Gender>().unwrap_or(Gender::Other),
                count,
            })
            .collect())
    }

    /// 可见范围内的学生ID，`None` 表示不限
    pub(super) async fn scoped_student_ids(&self, scope: &StudentScope) -> Result<Option<Vec<i64>>> {
        if *scope == StudentScope::All {
            return Ok(None);
        }

        let ids: Vec<i64> = scope_students(Students::find(), scope)
            .select_only()
            .column(Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(Some(ids))
    }

    /// 批量查询学生姓名和学号
    pub(super) async fn student_names(
        &self,
        ids: Vec<i64>,
    ) -> Result<HashMap<i64, (String, String)>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let students = Students::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(students
            .into_iter()
            .map(|s| (s.id, (s.full_name(), s.admission_no)))
            .collect())
    }

    async fn with_class_names(&self, students: Vec<StudentModel>) -> Result<Vec<StudentWithClass>> {
        let class_ids: Vec<i64> = students.iter().filter_map(|s| s.class_id).collect();

        let class_names: HashMap<i64, String> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            Classes::find()
                .filter(ClassColumn::Id.is_in(class_ids))
                .all(&self.db)
                .await
                .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(students
            .into_iter()
            .map(|m| {
                let class_name = m.class_id.and_then(|id| class_names.get(&id).cloned());
                StudentWithClass {
                    student: m.into_student(),
                    class_name,
                }
            })
            .collect())
    }
}
