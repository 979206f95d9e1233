use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    // 学期，如 "2025-T1"
    pub term: String,
    pub exam_date: chrono::DateTime<chrono::Utc>,
    // 满分
    pub max_score: f64,
    // 计算学期成绩时的权重
    pub weight: f64,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考试列表项 / 详情，附带班级和科目名称
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamWithNames {
    #[serde(flatten)]
    #[ts(flatten)]
    pub exam: Exam,
    pub class_name: Option<String>,
    pub subject_name: Option<String>,
}
