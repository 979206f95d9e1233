pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod list;
pub mod payments;
pub mod summary;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::fees::requests::{
    CreateFeeRequest, FeeFilterParams, FeeQueryParams, FeeSummaryParams, RecordPaymentRequest,
    UpdateFeeRequest,
};

define_service!(FeeService);

impl FeeService {
    pub async fn list_fees(
        &self,
        query: FeeQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_fees(self, query, request).await
    }

    pub async fn create_fee(
        &self,
        fee: CreateFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_fee(self, fee, request).await
    }

    pub async fn get_fee(&self, fee_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_fee(self, fee_id, request).await
    }

    pub async fn update_fee(
        &self,
        fee_id: i64,
        update: UpdateFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_fee(self, fee_id, update, request).await
    }

    pub async fn delete_fee(&self, fee_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_fee(self, fee_id, request).await
    }

    // 登记缴费
    pub async fn record_payment(
        &self,
        fee_id: i64,
        payment: RecordPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payments::record_payment(self, fee_id, payment, request).await
    }

    // 收费汇总
    pub async fn fee_summary(
        &self,
        query: FeeSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::fee_summary(self, query, request).await
    }

    pub async fn export_fees(
        &self,
        query: FeeFilterParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_fees(self, query, request).await
    }
}
