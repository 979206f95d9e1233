use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::requests::{FeeFilterParams, FeeListQuery};
use crate::services::{csv_response, current_user, internal_error, student_scope};

pub async fn export_fees(
    service: &FeeService,
    query: FeeFilterParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let export_query = FeeListQuery {
        student_id: query.student_id,
        term: query.term,
        status: query.status,
        scope: student_scope(&user),
        ..Default::default()
    };

    match storage.list_fees_for_export(export_query).await {
        Ok(rows) => Ok(csv_response("fees.csv", &rows)),
        Err(e) => Ok(internal_error("Failed to export fees", e)),
    }
}
