//! 考试存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, normalize_page};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams, Model as ExamModel};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    exams::{
        entities::{Exam, ExamWithNames},
        requests::{CreateExamRequest, ExamListQuery, UpdateExamRequest},
        responses::ExamListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_exam_impl(&self, req: CreateExamRequest, created_by: i64) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            term: Set(req.term),
            exam_date: Set(req.exam_date.timestamp()),
            max_score: Set(req.max_score),
            weight: Set(req.weight.unwrap_or(1.0)),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    pub async fn get_exam_by_id_impl(&self, id: i64) -> Result<Option<ExamWithNames>> {
        let result = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试失败: {e}")))?;

        match result {
            Some(model) => Ok(self.with_exam_names(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 分页列出考试，最近的在前
    pub async fn list_exams_with_pagination_impl(
        &self,
        query: ExamListQuery,
    ) -> Result<ExamListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Exams::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(ref term) = query.term
            && !term.trim().is_empty()
        {
            select = select.filter(Column::Term.eq(term.trim()));
        }
        if let Some(since) = query.since {
            select = select.filter(Column::ExamDate.gte(since.timestamp()));
        }

        let paginator = select
            .order_by_desc(Column::ExamDate)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试页数失败: {e}")))?;
        let exams = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(ExamListResponse {
            items: self.with_exam_names(exams).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_exam_impl(
        &self,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        if Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(term) = update.term {
            model.term = Set(term);
        }
        if let Some(exam_date) = update.exam_date {
            model.exam_date = Set(exam_date.timestamp());
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("更新考试失败: {e}")))?;

        Ok(Some(updated.into_exam()))
    }

    /// 删除考试，成绩随外键级联删除
    pub async fn delete_exam_impl(&self, id: i64) -> Result<bool> {
        let result = Exams::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除考试失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计考试数量；给定起始时间时只统计 [since, now] 区间内举行的考试
    pub async fn count_exams_impl(
        &self,
        since: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<u64> {
        let mut select = Exams::find();
        if let Some(since) = since {
            select = select
                .filter(Column::ExamDate.gte(since.timestamp()))
                .filter(Column::ExamDate.lte(chrono::Utc::now().timestamp()));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("统计考试数量失败: {e}")))
    }

    async fn with_exam_names(&self, exams: Vec<ExamModel>) -> Result<Vec<ExamWithNames>> {
        if exams.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<i64> = exams.iter().map(|e| e.class_id).collect();
        let subject_ids: Vec<i64> = exams.iter().map(|e| e.subject_id).collect();

        let class_names: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let subject_names = self.subject_names(subject_ids).await?;

        Ok(exams
            .into_iter()
            .map(|m| ExamWithNames {
                class_name: class_names.get(&m.class_id).cloned(),
                subject_name: subject_names.get(&m.subject_id).cloned(),
                exam: m.into_exam(),
            })
            .collect())
    }

    /// 批量查询科目名称
    pub(super) async fn subject_names(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(Subjects::find()
            .filter(SubjectColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect())
    }
}
