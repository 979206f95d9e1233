use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, ensure_class_has_room, ensure_linked_user, validate_guardian_phone};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::services::{bad_request, conflict, internal_error, storage_error};
use crate::utils::validate::{validate_code, validate_required_text};

pub async fn create_student(
    service: &StudentService,
    mut student: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    student.admission_no = student.admission_no.trim().to_string();
    if let Err(msg) = validate_code(&student.admission_no) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    for name in [&mut student.first_name, &mut student.last_name] {
        if let Err(msg) = validate_required_text(name, 64) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        *name = name.trim().to_string();
    }
    if let Err(resp) = validate_guardian_phone(&student.guardian_phone) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);

    match storage.get_student_by_admission_no(&student.admission_no).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                "Admission number already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to create student", e)),
    }

    if let Some(user_id) = student.user_id
        && let Err(resp) = ensure_linked_user(&storage, user_id, UserRole::Student).await
    {
        return Ok(resp);
    }
    if let Some(parent_id) = student.parent_id
        && let Err(resp) = ensure_linked_user(&storage, parent_id, UserRole::Parent).await
    {
        return Ok(resp);
    }

    // 新学生默认在读，占用班级名额
    if let Some(class_id) = student.class_id
        && let Err(resp) = ensure_class_has_room(&storage, class_id).await
    {
        return Ok(resp);
    }

    match storage.create_student(student).await {
        Ok(student) => {
            info!(
                "Student {} ({}) enrolled",
                student.full_name(),
                student.admission_no
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(student, "Student created")))
        }
        Err(e) => Ok(storage_error("Failed to create student", e)),
    }
}
