use super::entities::{FeePayment, FeeStatus, FeeWithBalance};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeListResponse {
    pub items: Vec<FeeWithBalance>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeDetailResponse {
    pub fee: FeeWithBalance,
    pub payments: Vec<FeePayment>,
}

// 收费汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeSummary {
    pub term: Option<String>,
    pub billed_cents: i64,
    pub collected_cents: i64,
    pub outstanding_cents: i64,
    pub paid_count: i64,
    pub partial_count: i64,
    pub unpaid_count: i64,
    pub overdue_count: i64,
}

impl FeeSummary {
    pub fn from_rows<'a>(
        term: Option<String>,
        rows: impl IntoIterator<Item = &'a FeeWithBalance>,
    ) -> Self {
        let mut summary = FeeSummary {
            term,
            ..Default::default()
        };
        for row in rows {
            summary.billed_cents += row.fee.amount_cents;
            summary.collected_cents += row.paid_cents;
            summary.outstanding_cents += row.balance_cents;
            match row.status {
                FeeStatus::Paid => summary.paid_count += 1,
                FeeStatus::Partial => summary.partial_count += 1,
                FeeStatus::Unpaid => summary.unpaid_count += 1,
                FeeStatus::Overdue => summary.overdue_count += 1,
            }
        }
        summary
    }
}
