use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::errors::SchoolDeskError;
use crate::models::{ApiResponse, ErrorCode, fees::requests::RecordPaymentRequest};
use crate::services::{bad_request, current_user, internal_error, not_found};

pub async fn record_payment(
    service: &FeeService,
    fee_id: i64,
    mut payment: RecordPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if payment.amount_cents <= 0 {
        return Ok(bad_request(
            ErrorCode::PaymentInvalid,
            "Payment amount must be greater than 0",
        ));
    }
    payment.reference = payment
        .reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let storage = service.get_storage(request);

    // 余额校验在存储层的事务内完成
    match storage.record_payment(fee_id, payment, user.id).await {
        Ok(payment) => {
            info!(
                "Payment of {} cents recorded for fee {} by user {}",
                payment.amount_cents, fee_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(payment, "Payment recorded")))
        }
        Err(SchoolDeskError::NotFound(_)) => {
            Ok(not_found(ErrorCode::FeeNotFound, "Fee not found"))
        }
        Err(SchoolDeskError::Validation(msg)) => Ok(bad_request(ErrorCode::PaymentInvalid, msg)),
        Err(e) => Ok(internal_error("Failed to record payment", e)),
    }
}
