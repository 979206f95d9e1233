use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report-card.ts")]
pub struct ReportCardParams {
    pub term: String,
}
