use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::{ApiResponse, ErrorCode, fees::requests::UpdateFeeRequest};
use crate::services::{bad_request, internal_error, not_found, storage_error};
use crate::utils::validate::{validate_required_text, validate_term};

pub async fn update_fee(
    service: &FeeService,
    fee_id: i64,
    mut update: UpdateFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = update.title.take() {
        if let Err(msg) = validate_required_text(&title, 128) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        update.title = Some(title.trim().to_string());
    }
    if let Some(term) = update.term.take() {
        if let Err(msg) = validate_term(&term) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        update.term = Some(term.trim().to_string());
    }

    let storage = service.get_storage(request);

    let current = match storage.get_fee_by_id(fee_id).await {
        Ok(Some(fee)) => fee,
        Ok(None) => return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => return Ok(internal_error("Failed to load fee", e)),
    };

    // 应缴金额不能低于已缴金额
    if let Some(amount) = update.amount_cents
        && (amount <= 0 || amount < current.paid_cents)
    {
        return Ok(bad_request(
            ErrorCode::PaymentInvalid,
            format!(
                "Amount must be positive and at least the {} cents already paid",
                current.paid_cents
            ),
        ));
    }

    match storage.update_fee(fee_id, update).await {
        Ok(Some(fee)) => Ok(HttpResponse::Ok().json(ApiResponse::success(fee, "Fee updated"))),
        Ok(None) => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => Ok(storage_error("Failed to update fee", e)),
    }
}
