use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, ensure_teacher_exists};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, internal_error, storage_error};
use crate::utils::validate::validate_required_text;

pub async fn create_class(
    service: &ClassService,
    mut class_data: CreateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_class_fields(
        Some(&class_data.name),
        Some(class_data.grade_level),
        Some(class_data.capacity),
    ) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    class_data.name = class_data.name.trim().to_string();

    let storage = service.get_storage(request);

    // 班级名称唯一
    match storage.get_class_by_name(&class_data.name).await {
        Ok(Some(_)) => {
            return Ok(conflict(ErrorCode::Conflict, "Class name already exists"));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to create class", e)),
    }

    if let Some(teacher_id) = class_data.supervisor_id
        && let Err(resp) = ensure_teacher_exists(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created successfully", class.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => Ok(storage_error("Failed to create class", e)),
    }
}

/// 班级字段校验，未提交的字段跳过
pub(crate) fn validate_class_fields(
    name: Option<&str>,
    grade_level: Option<i32>,
    capacity: Option<i32>,
) -> Result<(), &'static str> {
    if let Some(name) = name {
        validate_required_text(name, 64).map_err(|_| "Class name must be 1-64 characters")?;
    }
    if let Some(grade_level) = grade_level
        && grade_level < 0
    {
        return Err("Grade level must not be negative");
    }
    if let Some(capacity) = capacity
        && capacity <= 0
    {
        return Err("Capacity must be greater than 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_class_fields;

    #[test]
    fn test_capacity_must_be_positive() {
        assert!(validate_class_fields(Some("JSS 1A"), Some(7), Some(40)).is_ok());
        assert!(validate_class_fields(None, None, Some(0)).is_err());
        assert!(validate_class_fields(None, None, Some(-3)).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(validate_class_fields(Some("   "), None, None).is_err());
        assert!(validate_class_fields(None, Some(-1), None).is_err());
    }
}
