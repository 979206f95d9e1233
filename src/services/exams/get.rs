use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, load_exam};
use crate::models::ApiResponse;

pub async fn get_exam(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_exam(&storage, exam_id).await {
        Ok(exam) => Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "ok"))),
        Err(resp) => Ok(resp),
    }
}
