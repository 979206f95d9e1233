use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::responses::FeeDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found, student_scope};

/// 收费项详情，附带缴费记录
pub async fn get_fee(
    service: &FeeService,
    fee_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let fee = match storage.get_fee_by_id(fee_id).await {
        Ok(Some(fee)) => fee,
        Ok(None) => return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => return Ok(internal_error("Failed to get fee", e)),
    };

    if !user.role.is_staff() {
        let allowed = match storage.get_student_by_id(fee.fee.student_id).await {
            Ok(student) => {
                student.is_some_and(|s| student_scope(&user).allows(&s.student))
            }
            Err(e) => return Ok(internal_error("Failed to get fee", e)),
        };
        if !allowed {
            return Ok(forbidden("You can only view your own fees"));
        }
    }

    let payments = match storage.list_fee_payments(fee_id).await {
        Ok(payments) => payments,
        Err(e) => return Ok(internal_error("Failed to list payments", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FeeDetailResponse { fee, payments },
        "ok",
    )))
}
