use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission};
use crate::models::fees::requests::{
    CreateFeeRequest, FeeFilterParams, FeeQueryParams, FeeSummaryParams, RecordPaymentRequest,
    UpdateFeeRequest,
};
use crate::models::users::entities::Permission;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeQueryParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(query.into_inner(), &req).await
}

pub async fn create_fee(
    req: HttpRequest,
    body: web::Json<CreateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee(body.into_inner(), &req).await
}

pub async fn get_fee(req: HttpRequest, fee_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee(fee_id.0, &req).await
}

pub async fn update_fee(
    req: HttpRequest,
    fee_id: SafeIDI64,
    body: web::Json<UpdateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_fee(fee_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_fee(req: HttpRequest, fee_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(fee_id.0, &req).await
}

pub async fn record_payment(
    req: HttpRequest,
    fee_id: SafeIDI64,
    body: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .record_payment(fee_id.0, body.into_inner(), &req)
        .await
}

pub async fn fee_summary(
    req: HttpRequest,
    query: web::Query<FeeSummaryParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.fee_summary(query.into_inner(), &req).await
}

pub async fn export_fees(
    req: HttpRequest,
    query: web::Query<FeeFilterParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.export_fees(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_fees_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_fees)
                            .wrap(RequirePermission::new(Permission::ViewFees)),
                    )
                    .route(
                        web::post()
                            .to(create_fee)
                            .wrap(RequirePermission::new(Permission::ManageFees)),
                    ),
            )
            // 静态路径放在 /{id} 之前
            .service(
                web::resource("/summary").route(
                    web::get()
                        .to(fee_summary)
                        .wrap(RequirePermission::new(Permission::ManageFees)),
                ),
            )
            .service(
                web::resource("/export").route(
                    web::get()
                        .to(export_fees)
                        .wrap(RateLimit::export())
                        .wrap(RequirePermission::new(Permission::ManageFees)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_fee)
                            .wrap(RequirePermission::new(Permission::ViewFees)),
                    )
                    .route(
                        web::put()
                            .to(update_fee)
                            .wrap(RequirePermission::new(Permission::ManageFees)),
                    )
                    .route(
                        web::delete()
                            .to(delete_fee)
                            .wrap(RequirePermission::new(Permission::ManageFees)),
                    ),
            )
            .service(
                web::resource("/{id}/payments").route(
                    web::post()
                        .to(record_payment)
                        .wrap(RequirePermission::new(Permission::ManageFees)),
                ),
            ),
    );
}
