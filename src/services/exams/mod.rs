pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod results;
pub mod stats;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::exams::entities::ExamWithNames;
use crate::models::exams::requests::{
    CreateExamRequest, ExamQueryParams, RecordResultsRequest, UpdateExamRequest,
};
use crate::services::{internal_error, not_found};
use crate::storage::Storage;

define_service!(ExamService);

impl ExamService {
    pub async fn list_exams(
        &self,
        query: ExamQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_exams(self, query, request).await
    }

    pub async fn create_exam(
        &self,
        exam: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, exam, request).await
    }

    pub async fn get_exam(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_exam(self, exam_id, request).await
    }

    pub async fn update_exam(
        &self,
        exam_id: i64,
        update: UpdateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_exam(self, exam_id, update, request).await
    }

    pub async fn delete_exam(
        &self,
        exam_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exam(self, exam_id, request).await
    }

    // 考试的全部成绩
    pub async fn list_results(
        &self,
        exam_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::list_results(self, exam_id, request).await
    }

    // 批量录入成绩
    pub async fn record_results(
        &self,
        exam_id: i64,
        body: RecordResultsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::record_results(self, exam_id, body, request).await
    }

    pub async fn export_results(
        &self,
        exam_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::export_results(self, exam_id, request).await
    }

    // 考试统计
    pub async fn exam_stats(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::exam_stats(self, exam_id, request).await
    }
}

pub(crate) async fn load_exam(
    storage: &Arc<dyn Storage>,
    exam_id: i64,
) -> Result<ExamWithNames, HttpResponse> {
    match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => Ok(exam),
        Ok(None) => Err(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Err(internal_error("Failed to load exam", e)),
    }
}

/// 满分和权重都必须为正数
pub(crate) fn validate_exam_numbers(
    max_score: Option<f64>,
    weight: Option<f64>,
) -> Result<(), &'static str> {
    if let Some(max_score) = max_score
        && !(max_score.is_finite() && max_score > 0.0)
    {
        return Err("Max score must be greater than 0");
    }
    if let Some(weight) = weight
        && !(weight.is_finite() && weight > 0.0)
    {
        return Err("Weight must be greater than 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_exam_numbers;

    #[test]
    fn test_exam_numbers_must_be_positive() {
        assert!(validate_exam_numbers(Some(100.0), Some(1.0)).is_ok());
        assert!(validate_exam_numbers(None, None).is_ok());
        assert!(validate_exam_numbers(Some(0.0), None).is_err());
        assert!(validate_exam_numbers(None, Some(-0.5)).is_err());
        assert!(validate_exam_numbers(Some(f64::NAN), None).is_err());
    }
}
