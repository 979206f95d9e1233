use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubjectService, normalize_code};
use crate::models::{ApiResponse, ErrorCode, subjects::requests::CreateSubjectRequest};
use crate::services::{bad_request, conflict, internal_error, storage_error};
use crate::utils::validate::{validate_code, validate_required_text};

pub async fn create_subject(
    service: &SubjectService,
    mut subject: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required_text(&subject.name, 64) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    subject.name = subject.name.trim().to_string();
    subject.code = normalize_code(&subject.code);
    if let Err(msg) = validate_code(&subject.code) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    match storage.get_subject_by_code(&subject.code).await {
        Ok(Some(_)) => return Ok(conflict(ErrorCode::Conflict, "Subject code already exists")),
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to create subject", e)),
    }

    // 名称的唯一约束由数据库保证
    match storage.create_subject(subject).await {
        Ok(subject) => {
            info!("Subject {} ({}) created", subject.name, subject.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(subject, "Subject created")))
        }
        Err(e) => Ok(storage_error("Failed to create subject", e)),
    }
}
