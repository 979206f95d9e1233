use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, normalize_contact};
use crate::models::{ApiResponse, ErrorCode, teachers::requests::CreateTeacherRequest};
use crate::services::{bad_request, conflict, internal_error, not_found, storage_error};
use crate::utils::validate::{validate_code, validate_required_text};

pub async fn create_teacher(
    service: &TeacherService,
    mut teacher: CreateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    teacher.employee_no = teacher.employee_no.trim().to_string();
    if let Err(msg) = validate_code(&teacher.employee_no) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    for name in [&teacher.first_name, &teacher.last_name] {
        if let Err(msg) = validate_required_text(name, 64) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
    }
    teacher.first_name = teacher.first_name.trim().to_string();
    teacher.last_name = teacher.last_name.trim().to_string();

    match normalize_contact(teacher.email.take(), teacher.phone.take()) {
        Ok((email, phone)) => {
            teacher.email = email;
            teacher.phone = phone;
        }
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }

    let storage = service.get_storage(request);

    match storage.get_teacher_by_employee_no(&teacher.employee_no).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::Conflict,
                "Employee number already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to create teacher", e)),
    }

    if let Some(user_id) = teacher.user_id {
        match storage.get_user_by_id(user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Linked user not found")),
            Err(e) => return Ok(internal_error("Failed to create teacher", e)),
        }
    }

    match storage.create_teacher(teacher).await {
        Ok(teacher) => {
            info!("Teacher {} ({}) created", teacher.full_name(), teacher.employee_no);
            Ok(HttpResponse::Created().json(ApiResponse::success(teacher, "Teacher created")))
        }
        Err(e) => Ok(storage_error("Failed to create teacher", e)),
    }
}
