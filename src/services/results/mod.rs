use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::results::requests::{ResultListQuery, ResultQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error, not_found, student_scope};

define_service!(ResultService);

impl ResultService {
    /// 成绩列表；学生和家长只看到自己（孩子）的成绩
    pub async fn list_results(
        &self,
        query: ResultQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request);

        let list_query = ResultListQuery {
            page: Some(query.pagination.page),
            size: Some(query.pagination.size),
            student_id: query.student_id,
            exam_id: query.exam_id,
            term: query.term,
            scope: student_scope(&user),
        };

        match storage.list_results_with_pagination(list_query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Result list retrieved successfully",
            ))),
            Err(e) => Ok(internal_error("Failed to retrieve result list", e)),
        }
    }

    pub async fn delete_result(
        &self,
        result_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match storage.delete_result(result_id).await {
            Ok(true) => {
                info!("Result {} deleted", result_id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Result deleted")))
            }
            Ok(false) => Ok(not_found(ErrorCode::ResultNotFound, "Result not found")),
            Err(e) => Ok(internal_error("Failed to delete result", e)),
        }
    }
}
