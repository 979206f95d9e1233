use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::create::validate_class_fields;
use super::{ClassService, ensure_teacher_exists};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, internal_error, not_found, storage_error};

pub async fn update_class(
    service: &ClassService,
    class_id: i64,
    mut update: UpdateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) =
        validate_class_fields(update.name.as_deref(), update.grade_level, update.capacity)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    update.name = update.name.map(|n| n.trim().to_string());

    let storage = service.get_storage(request);

    if let Some(ref name) = update.name {
        match storage.get_class_by_name(name).await {
            Ok(Some(other)) if other.id != class_id => {
                return Ok(conflict(ErrorCode::Conflict, "Class name already exists"));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to update class", e)),
        }
    }

    if let Some(teacher_id) = update.supervisor_id
        && let Err(resp) = ensure_teacher_exists(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    // 容量不能低于当前在读人数
    if let Some(capacity) = update.capacity {
        match storage.count_class_students(class_id).await {
            Ok(enrolled) if enrolled > capacity as i64 => {
                return Ok(conflict(
                    ErrorCode::ClassFull,
                    format!("Capacity {capacity} is below the {enrolled} enrolled students"),
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to update class", e)),
        }
    }

    match storage.update_class(class_id, update).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error("Failed to update class", e)),
    }
}
