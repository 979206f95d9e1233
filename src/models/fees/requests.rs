use super::entities::{FeeStatus, PaymentMethod};
use crate::models::common::{PaginationQuery, deserialize_optional_number};
use crate::models::students::requests::StudentScope;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub student_id: Option<i64>,
    pub term: Option<String>,
    pub status: Option<FeeStatus>,
}

// 导出与汇总共用的筛选条件
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub student_id: Option<i64>,
    pub term: Option<String>,
    pub status: Option<FeeStatus>,
}

// 汇总可按学期筛选
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeSummaryParams {
    pub term: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateFeeRequest {
    pub student_id: i64,
    pub title: String,
    pub term: String,
    pub amount_cents: i64,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdateFeeRequest {
    pub title: Option<String>,
    pub term: Option<String>,
    pub amount_cents: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct RecordPaymentRequest {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

// 收费列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct FeeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub term: Option<String>,
    pub status: Option<FeeStatus>,
    pub scope: StudentScope,
}

impl Default for FeeListQuery {
    fn default() -> Self {
        Self {
            page: None,
            size: None,
            student_id: None,
            term: None,
            status: None,
            scope: StudentScope::All,
        }
    }
}
