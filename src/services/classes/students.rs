use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, load_class};
use crate::models::ApiResponse;
use crate::services::internal_error;

pub async fn list_class_students(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_class(&storage, class_id).await {
        return Ok(resp);
    }

    match storage.list_class_students(class_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(students, "ok"))),
        Err(e) => Ok(internal_error("Failed to list class students", e)),
    }
}
