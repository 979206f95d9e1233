use super::entities::StudentWithClass;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 学生列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<StudentWithClass>,
    pub pagination: PaginationInfo,
}
