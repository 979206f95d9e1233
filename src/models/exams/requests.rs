use crate::models::common::{PaginationQuery, deserialize_optional_number};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub subject_id: Option<i64>,
    pub term: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub term: String,
    pub exam_date: chrono::DateTime<chrono::Utc>,
    pub max_score: f64,
    // 不填默认为 1
    pub weight: Option<f64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct UpdateExamRequest {
    pub title: Option<String>,
    pub term: Option<String>,
    pub exam_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_score: Option<f64>,
    pub weight: Option<f64>,
}

// 单个学生的成绩录入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ResultEntry {
    pub student_id: i64,
    pub score: f64,
    pub remark: Option<String>,
}

// 批量录入成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct RecordResultsRequest {
    pub results: Vec<ResultEntry>,
}

// 考试列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ExamListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub term: Option<String>,
    // 只看最近的考试（dashboard 统计用）
    pub since: Option<chrono::DateTime<chrono::Utc>>,
}
