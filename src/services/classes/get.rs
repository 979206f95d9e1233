use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, load_class};
use crate::models::{ApiResponse, classes::responses::ClassDetailResponse};
use crate::services::internal_error;

/// 班级详情：班主任、在读人数和科目安排
pub async fn get_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match load_class(&storage, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    let supervisor = match class.supervisor_id {
        Some(teacher_id) => match storage.get_teacher_by_id(teacher_id).await {
            Ok(teacher) => teacher,
            Err(e) => return Ok(internal_error("Failed to load supervisor", e)),
        },
        None => None,
    };

    let student_count = match storage.count_class_students(class_id).await {
        Ok(count) => count,
        Err(e) => return Ok(internal_error("Failed to count class students", e)),
    };

    let subjects = match storage.list_class_subjects(class_id).await {
        Ok(subjects) => subjects,
        Err(e) => return Ok(internal_error("Failed to list class subjects", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetailResponse {
            class,
            supervisor,
            student_count,
            subjects,
        },
        "Class information retrieved successfully",
    )))
}
