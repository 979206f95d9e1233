use crate::models::common::{PaginationQuery, deserialize_optional_number};
use crate::models::students::requests::StudentScope;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub exam_id: Option<i64>,
    pub term: Option<String>,
}

// 成绩列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct ResultListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub exam_id: Option<i64>,
    pub term: Option<String>,
    pub scope: StudentScope,
}
