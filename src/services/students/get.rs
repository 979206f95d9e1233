use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, success};
use crate::models::ErrorCode;
use crate::services::{current_user, forbidden, internal_error, not_found, student_scope};

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => {
            if !student_scope(&user).allows(&student.student) {
                return Ok(forbidden("You can only view your own student records"));
            }
            Ok(success(student, "ok"))
        }
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(internal_error("Failed to get student", e)),
    }
}
