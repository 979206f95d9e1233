use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, normalize_contact};
use crate::models::{ApiResponse, ErrorCode, teachers::requests::UpdateTeacherRequest};
use crate::services::{bad_request, internal_error, not_found, storage_error};
use crate::utils::validate::validate_required_text;

pub async fn update_teacher(
    service: &TeacherService,
    teacher_id: i64,
    mut update: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    for name in [&mut update.first_name, &mut update.last_name]
        .into_iter()
        .flatten()
    {
        if let Err(msg) = validate_required_text(name, 64) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        *name = name.trim().to_string();
    }

    // 只校验本次提交的联系方式，未提交的字段保持不变
    let had_email = update.email.is_some();
    let had_phone = update.phone.is_some();
    match normalize_contact(update.email.take(), update.phone.take()) {
        Ok((email, phone)) => {
            if had_email {
                update.email = email;
            }
            if had_phone {
                update.phone = phone;
            }
        }
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }

    let storage = service.get_storage(request);

    if let Some(user_id) = update.user_id {
        match storage.get_user_by_id(user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Linked user not found")),
            Err(e) => return Ok(internal_error("Failed to update teacher", e)),
        }
    }

    match storage.update_teacher(teacher_id, update).await {
        Ok(Some(teacher)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(teacher, "Teacher updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Ok(storage_error("Failed to update teacher", e)),
    }
}
