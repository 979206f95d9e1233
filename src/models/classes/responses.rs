use super::entities::{Class, ClassSubject, ClassSummary};
use crate::models::common::PaginationInfo;
use crate::models::teachers::entities::Teacher;
use serde::Serialize;
use ts_rs::TS;

// 班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ClassSummary>,
}

// 班级详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    pub class: Class,
    pub supervisor: Option<Teacher>,
    pub student_count: i64,
    pub subjects: Vec<ClassSubject>,
}
