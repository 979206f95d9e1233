use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, success};
use crate::models::students::requests::{StudentListQuery, StudentQueryParams};
use crate::services::{current_user, internal_error, student_scope};

pub async fn list_students(
    service: &StudentService,
    query: StudentQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let list_query = StudentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        class_id: query.class_id,
        status: query.status,
        scope: student_scope(&user),
    };

    match storage.list_students_with_pagination(list_query).await {
        Ok(response) => Ok(success(response, "Student list retrieved successfully")),
        Err(e) => Ok(internal_error("Failed to retrieve student list", e)),
    }
}
