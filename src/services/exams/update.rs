use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_exam, validate_exam_numbers};
use crate::models::{ApiResponse, ErrorCode, exams::requests::UpdateExamRequest};
use crate::services::{bad_request, internal_error, not_found, storage_error};
use crate::utils::validate::{validate_required_text, validate_term};

pub async fn update_exam(
    service: &ExamService,
    exam_id: i64,
    mut update: UpdateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = update.title.take() {
        if let Err(msg) = validate_required_text(&title, 128) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        update.title = Some(title.trim().to_string());
    }
    if let Some(term) = update.term.take() {
        if let Err(msg) = validate_term(&term) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        update.term = Some(term.trim().to_string());
    }
    if let Err(msg) = validate_exam_numbers(update.max_score, update.weight) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    if let Err(resp) = load_exam(&storage, exam_id).await {
        return Ok(resp);
    }

    // 满分不能低于已录入的最高分
    if let Some(max_score) = update.max_score {
        let results = match storage.list_exam_results(exam_id).await {
            Ok(results) => results,
            Err(e) => return Ok(internal_error("Failed to load exam results", e)),
        };
        if let Some(highest) = results
            .iter()
            .map(|r| r.result.score)
            .reduce(f64::max)
            .filter(|highest| *highest > max_score)
        {
            return Ok(bad_request(
                ErrorCode::ScoreOutOfRange,
                format!("Max score {max_score} is below an existing score of {highest}"),
            ));
        }
    }

    match storage.update_exam(exam_id, update).await {
        Ok(Some(exam)) => Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "Exam updated"))),
        Ok(None) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(storage_error("Failed to update exam", e)),
    }
}
