//! 班级及班级科目存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, normalize_page};
use crate::entity::class_subjects::{
    ActiveModel as ClassSubjectActiveModel, Column as ClassSubjectColumn,
    Entity as ClassSubjects, Model as ClassSubjectModel,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::from_timestamp;
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::{Class, ClassSubject, ClassSummary},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    students::entities::{Student, StudentStatus},
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            capacity: Set(req.capacity),
            supervisor_id: Set(req.supervisor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过名称获取班级
    pub async fn get_class_by_name_impl(&self, name: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级，附带在读人数和班主任姓名
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classes::find();

        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(like_contains(Column::Name, search));
        }

        select = select
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Name);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级列表失败: {e}")))?;

        let class_ids: Vec<i64> = classes.iter().map(|c| c.id).collect();
        let supervisor_ids: Vec<i64> = classes.iter().filter_map(|c| c.supervisor_id).collect();

        let counts = self.active_student_counts(class_ids).await?;
        let supervisors = self.teacher_names(supervisor_ids).await?;

        let items = classes
            .into_iter()
            .map(|m| {
                let student_count = counts.get(&m.id).copied().unwrap_or(0);
                let supervisor_name = m.supervisor_id.and_then(|id| supervisors.get(&id).cloned());
                ClassSummary {
                    class: m.into_class(),
                    student_count,
                    supervisor_name,
                }
            })
            .collect();

        Ok(ClassListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(supervisor_id) = update.supervisor_id {
            model.supervisor_id = Set(Some(supervisor_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级，学生的 class_id 由外键置空
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级在读学生人数
    pub async fn count_class_students_impl(&self, class_id: i64) -> Result<i64> {
        let counts = self.active_student_counts(vec![class_id]).await?;
        Ok(counts.get(&class_id).copied().unwrap_or(0))
    }

    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(StudentColumn::ClassId.eq(class_id))
            .order_by_asc(StudentColumn::LastName)
            .order_by_asc(StudentColumn::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn count_classes_impl(&self) -> Result<u64> {
        Classes::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计班级数量失败: {e}")))
    }

    pub async fn list_class_subjects_impl(&self, class_id: i64) -> Result<Vec<ClassSubject>> {
        let rows = ClassSubjects::find()
            .filter(ClassSubjectColumn::ClassId.eq(class_id))
            .order_by_asc(ClassSubjectColumn::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级科目失败: {e}")))?;

        self.hydrate_class_subjects(rows).await
    }

    pub async fn get_class_subject_impl(
        &self,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Option<ClassSubject>> {
        let row = self.find_class_subject(class_id, subject_id).await?;
        match row {
            Some(row) => Ok(self.hydrate_class_subjects(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 为班级安排科目，已存在则更新任课教师
    pub async fn assign_subject_impl(
        &self,
        class_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<ClassSubject> {
        let saved = match self.find_class_subject(class_id, subject_id).await? {
            Some(existing) => {
                let mut model: ClassSubjectActiveModel = existing.into();
                model.teacher_id = Set(teacher_id);
                model.update(&self.db).await.map_err(|e| {
                    SchoolDeskError::database_operation(format!("更新班级科目失败: {e}"))
                })?
            }
            None => ClassSubjectActiveModel {
                class_id: Set(class_id),
                subject_id: Set(subject_id),
                teacher_id: Set(teacher_id),
                assigned_at: Set(chrono::Utc::now().timestamp()),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("安排班级科目失败: {e}")))?,
        };

        self.hydrate_class_subjects(vec![saved])
            .await?
            .pop()
            .ok_or_else(|| SchoolDeskError::not_found("班级或科目不存在"))
    }

    pub async fn unassign_subject_impl(&self, class_id: i64, subject_id: i64) -> Result<bool> {
        let result = ClassSubjects::delete_many()
            .filter(ClassSubjectColumn::ClassId.eq(class_id))
            .filter(ClassSubjectColumn::SubjectId.eq(subject_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("取消班级科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_class_subject(
        &self,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Option<ClassSubjectModel>> {
        ClassSubjects::find()
            .filter(ClassSubjectColumn::ClassId.eq(class_id))
            .filter(ClassSubjectColumn::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级科目失败: {e}")))
    }

    /// 补全班级科目的班级名、科目名和教师姓名
    pub(super) async fn hydrate_class_subjects(
        &self,
        rows: Vec<ClassSubjectModel>,
    ) -> Result<Vec<ClassSubject>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<i64> = rows.iter().map(|r| r.class_id).collect();
        let subject_ids: Vec<i64> = rows.iter().map(|r| r.subject_id).collect();
        let teacher_ids: Vec<i64> = rows.iter().filter_map(|r| r.teacher_id).collect();

        let class_names: HashMap<i64, String> = Classes::find()
            .filter(Column::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let subjects: HashMap<i64, (String, String)> = Subjects::find()
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, (s.name, s.code)))
            .collect();

        let teacher_names = self.teacher_names(teacher_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (subject_name, subject_code) =
                    subjects.get(&row.subject_id).cloned().unwrap_or_default();
                ClassSubject {
                    id: row.id,
                    class_id: row.class_id,
                    class_name: class_names.get(&row.class_id).cloned().unwrap_or_default(),
                    subject_id: row.subject_id,
                    subject_name,
                    subject_code,
                    teacher_id: row.teacher_id,
                    teacher_name: row.teacher_id.and_then(|id| teacher_names.get(&id).cloned()),
                    assigned_at: from_timestamp(row.assigned_at),
                }
            })
            .collect())
    }

    /// 按班级分组统计在读学生人数
    pub(super) async fn active_student_counts(
        &self,
        class_ids: Vec<i64>,
    ) -> Result<HashMap<i64, i64>> {
        if class_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Option<i64>, i64)> = Students::find()
            .select_only()
            .column(StudentColumn::ClassId)
            .column_as(StudentColumn::Id.count(), "student_count")
            .filter(StudentColumn::ClassId.is_in(class_ids))
            .filter(StudentColumn::Status.eq(StudentStatus::Active.to_string()))
            .group_by(StudentColumn::ClassId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计班级人数失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(class_id, count)| class_id.map(|id| (id, count)))
            .collect())
    }
}
