use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, validate_exam_numbers};
use crate::models::{ApiResponse, ErrorCode, exams::requests::CreateExamRequest};
use crate::services::classes::load_class;
use crate::services::{bad_request, current_user, internal_error, storage_error};
use crate::utils::validate::{validate_required_text, validate_term};

pub async fn create_exam(
    service: &ExamService,
    mut exam: CreateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_required_text(&exam.title, 128) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_term(&exam.term) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_exam_numbers(Some(exam.max_score), exam.weight) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    exam.title = exam.title.trim().to_string();
    exam.term = exam.term.trim().to_string();

    let storage = service.get_storage(request);

    if let Err(resp) = load_class(&storage, exam.class_id).await {
        return Ok(resp);
    }

    // 只能为班级已开设的科目安排考试
    match storage.get_class_subject(exam.class_id, exam.subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::SubjectNotAssigned,
                "Subject is not assigned to this class",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to create exam", e)),
    }

    match storage.create_exam(exam, user.id).await {
        Ok(exam) => {
            info!(
                "Exam '{}' created for class {} by user {}",
                exam.title, exam.class_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Exam created")))
        }
        Err(e) => Ok(storage_error("Failed to create exam", e)),
    }
}
