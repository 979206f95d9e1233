use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_fee(
    service: &FeeService,
    fee_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_fee(fee_id).await {
        Ok(true) => {
            info!("Fee {} deleted with its payments", fee_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Fee deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => Ok(internal_error("Failed to delete fee", e)),
    }
}
