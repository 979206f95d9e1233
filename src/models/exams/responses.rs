use super::entities::ExamWithNames;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamListResponse {
    pub items: Vec<ExamWithNames>,
    pub pagination: PaginationInfo,
}

// 批量录入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct RecordResultsResponse {
    pub inserted: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct GradeCount {
    pub grade: String,
    pub count: i64,
}

// 考试统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamStatsResponse {
    pub exam_id: i64,
    pub count: i64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    // 及格率（百分比）
    pub pass_rate: Option<f64>,
    pub distribution: Vec<GradeCount>,
}
