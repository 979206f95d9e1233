use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::{ApiResponse, fees::requests::FeeSummaryParams};
use crate::services::internal_error;

pub async fn fee_summary(
    service: &FeeService,
    query: FeeSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let term = query
        .term
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    match storage.fee_summary(term).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "ok"))),
        Err(e) => Ok(internal_error("Failed to summarize fees", e)),
    }
}
