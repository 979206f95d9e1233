use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::{
    ApiResponse,
    exams::requests::{ExamListQuery, ExamQueryParams},
};
use crate::services::internal_error;

pub async fn list_exams(
    service: &ExamService,
    query: ExamQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = ExamListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        class_id: query.class_id,
        subject_id: query.subject_id,
        term: query.term,
        since: None,
    };

    match storage.list_exams_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Exam list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve exam list", e)),
    }
}
