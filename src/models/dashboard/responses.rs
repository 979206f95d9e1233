use crate::models::common::Gender;
use crate::models::fees::responses::FeeSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct GenderCount {
    pub gender: Gender,
    pub count: i64,
}

// 各类记录数量
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct EntityCounts {
    pub users: i64,
    pub students: i64,
    pub teachers: i64,
    pub classes: i64,
    pub subjects: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardSummary {
    pub counts: EntityCounts,
    pub students_by_gender: Vec<GenderCount>,
    pub fees: FeeSummary,
    // 最近 30 天内的考试数
    pub recent_exams: i64,
}
