use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, ensure_teacher_exists, load_class};
use crate::models::classes::requests::AssignSubjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

/// 同一班级同一科目只保留一条安排，重复提交时更新任课教师
pub async fn assign_subject(
    service: &ClassService,
    class_id: i64,
    assignment: AssignSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_class(&storage, class_id).await {
        return Ok(resp);
    }

    match storage.get_subject_by_id(assignment.subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => return Ok(internal_error("Failed to load subject", e)),
    }

    if let Some(teacher_id) = assignment.teacher_id
        && let Err(resp) = ensure_teacher_exists(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    match storage
        .assign_subject(class_id, assignment.subject_id, assignment.teacher_id)
        .await
    {
        Ok(assigned) => {
            info!(
                "Subject {} assigned to class {} (teacher {:?})",
                assigned.subject_code, assigned.class_name, assigned.teacher_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(assigned, "Subject assigned")))
        }
        Err(e) => Ok(internal_error("Failed to assign subject", e)),
    }
}

pub async fn unassign_subject(
    service: &ClassService,
    class_id: i64,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.unassign_subject(class_id, subject_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Subject unassigned"))),
        Ok(false) => Ok(not_found(
            ErrorCode::SubjectNotAssigned,
            "Subject is not assigned to this class",
        )),
        Err(e) => Ok(internal_error("Failed to unassign subject", e)),
    }
}
