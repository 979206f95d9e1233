use serde::Serialize;
use ts_rs::TS;

// 一条参与成绩计算的原始记录：学生在某次考试中的得分
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub student_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
}

// 单科学期成绩
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report-card.ts")]
pub struct SubjectReport {
    pub subject_id: i64,
    pub subject_name: String,
    pub exam_count: i64,
    // 加权百分比
    pub percentage: f64,
    pub grade: String,
    pub remark: String,
}
