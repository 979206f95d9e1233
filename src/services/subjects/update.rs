use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, normalize_code};
use crate::models::{ApiResponse, ErrorCode, subjects::requests::UpdateSubjectRequest};
use crate::services::{bad_request, conflict, internal_error, not_found, storage_error};
use crate::utils::validate::{validate_code, validate_required_text};

pub async fn update_subject(
    service: &SubjectService,
    subject_id: i64,
    mut update: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = update.name.take() {
        if let Err(msg) = validate_required_text(&name, 64) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        update.name = Some(name.trim().to_string());
    }

    let storage = service.get_storage(request);

    if let Some(code) = update.code.take() {
        let code = normalize_code(&code);
        if let Err(msg) = validate_code(&code) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        match storage.get_subject_by_code(&code).await {
            Ok(Some(other)) if other.id != subject_id => {
                return Ok(conflict(ErrorCode::Conflict, "Subject code already exists"));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to update subject", e)),
        }
        update.code = Some(code);
    }

    match storage.update_subject(subject_id, update).await {
        Ok(Some(subject)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "Subject updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error("Failed to update subject", e)),
    }
}
