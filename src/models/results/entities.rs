use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub remark: Option<String>,
    // 录入人
    pub recorded_by: Option<i64>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 成绩列表项，带考试、科目和学生信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub result: ExamResult,
    pub exam_title: String,
    pub term: String,
    pub max_score: f64,
    pub subject_id: i64,
    pub subject_name: Option<String>,
    pub student_name: Option<String>,
    pub admission_no: Option<String>,
    pub percentage: f64,
}
