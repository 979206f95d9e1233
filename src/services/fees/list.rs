use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::{
    ApiResponse,
    fees::requests::{FeeListQuery, FeeQueryParams},
};
use crate::services::{current_user, internal_error, student_scope};

pub async fn list_fees(
    service: &FeeService,
    query: FeeQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let list_query = FeeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: query.student_id,
        term: query.term,
        status: query.status,
        scope: student_scope(&user),
    };

    match storage.list_fees_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Fee list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve fee list", e)),
    }
}
