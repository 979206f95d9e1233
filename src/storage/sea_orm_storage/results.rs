//! 考试成绩存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, normalize_page};
use crate::entity::exam_results::{
    ActiveModel, Column, Entity as ExamResults, Model as ExamResultModel,
};
use crate::entity::exams::{Column as ExamColumn, Entity as Exams, Model as ExamModel};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, SchoolDeskError};
use crate::models::{
    PaginationInfo,
    exams::{entities::Exam, requests::ResultEntry, responses::RecordResultsResponse},
    report_cards::entities::ScoreRow,
    results::{
        entities::{ExamResult, ResultDetail},
        requests::ResultListQuery,
        responses::ResultListResponse,
    },
};
use crate::utils::grading::percentage;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 在同一事务中录入整场考试的成绩：已有记录更新，其余插入。
    /// 任一学生不属于考试所在班级时整体回滚。
    pub async fn record_exam_results_impl(
        &self,
        exam: &Exam,
        entries: Vec<ResultEntry>,
        recorded_by: i64,
    ) -> Result<RecordResultsResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("开启事务失败: {e}")))?;

        let student_ids: Vec<i64> = entries.iter().map(|e| e.student_id).collect();

        let members: HashSet<i64> = Students::find()
            .select_only()
            .column(StudentColumn::Id)
            .filter(StudentColumn::ClassId.eq(exam.class_id))
            .filter(StudentColumn::Id.is_in(student_ids.clone()))
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询班级学生失败: {e}")))?
            .into_iter()
            .collect();

        if let Some(outsider) = entries.iter().find(|e| !members.contains(&e.student_id)) {
            return Err(SchoolDeskError::validation(format!(
                "学生 {} 不在该考试所属班级",
                outsider.student_id
            )));
        }

        let mut existing: HashMap<i64, ExamResultModel> = ExamResults::find()
            .filter(Column::ExamId.eq(exam.id))
            .filter(Column::StudentId.is_in(student_ids))
            .all(&txn)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩失败: {e}")))?
            .into_iter()
            .map(|m| (m.student_id, m))
            .collect();

        let now = chrono::Utc::now().timestamp();
        let mut summary = RecordResultsResponse {
            inserted: 0,
            updated: 0,
        };

        for entry in entries {
            match existing.remove(&entry.student_id) {
                Some(current) => {
                    let mut model: ActiveModel = current.into();
                    model.score = Set(entry.score);
                    model.remark = Set(entry.remark);
                    model.recorded_by = Set(Some(recorded_by));
                    model.updated_at = Set(now);
                    model.update(&txn).await.map_err(|e| {
                        SchoolDeskError::database_operation(format!("更新成绩失败: {e}"))
                    })?;
                    summary.updated += 1;
                }
                None => {
                    ActiveModel {
                        exam_id: Set(exam.id),
                        student_id: Set(entry.student_id),
                        score: Set(entry.score),
                        remark: Set(entry.remark),
                        recorded_by: Set(Some(recorded_by)),
                        recorded_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        SchoolDeskError::database_operation(format!("录入成绩失败: {e}"))
                    })?;
                    summary.inserted += 1;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(summary)
    }

    /// 某场考试的全部成绩，按学生姓名排序
    pub async fn list_exam_results_impl(&self, exam_id: i64) -> Result<Vec<ResultDetail>> {
        let results = ExamResults::find()
            .filter(Column::ExamId.eq(exam_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩失败: {e}")))?;

        let mut details = self.with_result_details(results).await?;
        details.sort_by(|a, b| a.student_name.cmp(&b.student_name));
        Ok(details)
    }

    pub async fn list_results_with_pagination_impl(
        &self,
        query: ResultListQuery,
    ) -> Result<ResultListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ExamResults::find();

        if let Some(ids) = self.scoped_student_ids(&query.scope).await? {
            select = select.filter(Column::StudentId.is_in(ids));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(exam_id) = query.exam_id {
            select = select.filter(Column::ExamId.eq(exam_id));
        }
        if let Some(ref term) = query.term
            && !term.trim().is_empty()
        {
            let exam_ids: Vec<i64> = Exams::find()
                .select_only()
                .column(ExamColumn::Id)
                .filter(ExamColumn::Term.eq(term.trim()))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| SchoolDeskError::database_operation(format!("查询考试失败: {e}")))?;
            select = select.filter(Column::ExamId.is_in(exam_ids));
        }

        let paginator = select
            .order_by_desc(Column::RecordedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩页数失败: {e}")))?;
        let results = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(ResultListResponse {
            items: self.with_result_details(results).await?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn get_result_by_id_impl(&self, id: i64) -> Result<Option<ExamResult>> {
        let result = ExamResults::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_result()))
    }

    pub async fn delete_result_impl(&self, id: i64) -> Result<bool> {
        let result = ExamResults::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级某学期全部考试的得分
    pub async fn list_term_scores_impl(&self, class_id: i64, term: &str) -> Result<Vec<ScoreRow>> {
        let exams: HashMap<i64, ExamModel> = Exams::find()
            .filter(ExamColumn::ClassId.eq(class_id))
            .filter(ExamColumn::Term.eq(term))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试失败: {e}")))?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        if exams.is_empty() {
            return Ok(Vec::new());
        }

        let results = ExamResults::find()
            .filter(Column::ExamId.is_in(exams.keys().copied().collect::<Vec<_>>()))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询成绩失败: {e}")))?;

        let subject_names = self
            .subject_names(exams.values().map(|e| e.subject_id).collect())
            .await?;

        Ok(results
            .into_iter()
            .filter_map(|r| {
                let exam = exams.get(&r.exam_id)?;
                Some(ScoreRow {
                    student_id: r.student_id,
                    subject_id: exam.subject_id,
                    subject_name: subject_names
                        .get(&exam.subject_id)
                        .cloned()
                        .unwrap_or_default(),
                    score: r.score,
                    max_score: exam.max_score,
                    weight: exam.weight,
                })
            })
            .collect())
    }

    async fn with_result_details(
        &self,
        results: Vec<ExamResultModel>,
    ) -> Result<Vec<ResultDetail>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let exam_ids: Vec<i64> = results.iter().map(|r| r.exam_id).collect();
        let student_ids: Vec<i64> = results.iter().map(|r| r.student_id).collect();

        let exams: HashMap<i64, ExamModel> = Exams::find()
            .filter(ExamColumn::Id.is_in(exam_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("查询考试失败: {e}")))?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let subject_names = self
            .subject_names(exams.values().map(|e| e.subject_id).collect())
            .await?;
        let students = self.student_names(student_ids).await?;

        Ok(results
            .into_iter()
            .filter_map(|r| {
                let exam = exams.get(&r.exam_id)?;
                let student = students.get(&r.student_id);
                Some(ResultDetail {
                    exam_title: exam.title.clone(),
                    term: exam.term.clone(),
                    max_score: exam.max_score,
                    subject_id: exam.subject_id,
                    subject_name: subject_names.get(&exam.subject_id).cloned(),
                    student_name: student.map(|(name, _)| name.clone()),
                    admission_no: student.map(|(_, no)| no.clone()),
                    percentage: percentage(r.score, exam.max_score),
                    result: r.into_result(),
                })
            })
            .collect())
    }
}
