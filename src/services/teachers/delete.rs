use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

/// 删除教师；其担任的班主任和任课安排置空
pub async fn delete_teacher(
    service: &TeacherService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_teacher(teacher_id).await {
        Ok(true) => {
            info!("Teacher {} deleted", teacher_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(internal_error("Failed to delete teacher", e)),
    }
}
