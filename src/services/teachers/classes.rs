use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn teacher_classes(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => return Ok(internal_error("Failed to get teacher", e)),
    }

    match storage.list_teacher_classes(teacher_id).await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(classes, "ok"))),
        Err(e) => Ok(internal_error("Failed to list teacher classes", e)),
    }
}
