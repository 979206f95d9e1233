use super::entities::ResultDetail;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListResponse {
    pub items: Vec<ResultDetail>,
    pub pagination: PaginationInfo,
}
