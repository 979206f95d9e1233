use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::students::requests::{StudentExportParams, StudentListQuery};
use crate::services::{csv_response, current_user, internal_error, student_scope};

pub async fn export_students(
    service: &StudentService,
    query: StudentExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let export_query = StudentListQuery {
        search: query.search,
        class_id: query.class_id,
        status: query.status,
        scope: student_scope(&user),
        ..Default::default()
    };

    match storage.list_students_for_export(export_query).await {
        Ok(rows) => Ok(csv_response("students.csv", &rows)),
        Err(e) => Ok(internal_error("Failed to export students", e)),
    }
}
