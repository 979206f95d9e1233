use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_exam(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_exam(exam_id).await {
        Ok(true) => {
            info!("Exam {} deleted with its results", exam_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(internal_error("Failed to delete exam", e)),
    }
}
