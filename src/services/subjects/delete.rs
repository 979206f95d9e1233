use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_subject(
    service: &SubjectService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_subject(subject_id).await {
        Ok(true) => {
            info!("Subject {} deleted", subject_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Subject deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(internal_error("Failed to delete subject", e)),
    }
}
