use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_exam};
use crate::models::ApiResponse;
use crate::services::internal_error;
use crate::utils::grading::{GradeScale, exam_stats as compute_stats};

pub async fn exam_stats(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let exam = match load_exam(&storage, exam_id).await {
        Ok(found) => found.exam,
        Err(resp) => return Ok(resp),
    };

    let scores: Vec<f64> = match storage.list_exam_results(exam_id).await {
        Ok(rows) => rows.into_iter().map(|r| r.result.score).collect(),
        Err(e) => return Ok(internal_error("Failed to load exam results", e)),
    };

    let stats = compute_stats(exam.id, &scores, exam.max_score, &GradeScale::current());
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "ok")))
}
