use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::{ApiResponse, ErrorCode, fees::requests::CreateFeeRequest};
use crate::services::{bad_request, internal_error, not_found, storage_error};
use crate::utils::validate::{validate_required_text, validate_term};

pub async fn create_fee(
    service: &FeeService,
    mut fee: CreateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if fee.amount_cents <= 0 {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "Amount must be greater than 0",
        ));
    }
    if let Err(msg) = validate_required_text(&fee.title, 128) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_term(&fee.term) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }
    fee.title = fee.title.trim().to_string();
    fee.term = fee.term.trim().to_string();

    let storage = service.get_storage(request);

    match storage.get_student_by_id(fee.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to create fee", e)),
    }

    match storage.create_fee(fee).await {
        Ok(fee) => {
            info!(
                "Fee '{}' of {} cents billed to student {}",
                fee.title, fee.amount_cents, fee.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(fee, "Fee created")))
        }
        Err(e) => Ok(storage_error("Failed to create fee", e)),
    }
}
