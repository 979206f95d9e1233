use super::entities::Teacher;
use crate::models::classes::entities::{Class, ClassSubject};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 教师列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListResponse {
    pub items: Vec<Teacher>,
    pub pagination: PaginationInfo,
}

// 教师任课情况
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherClassesResponse {
    // 担任班主任的班级
    pub supervised: Vec<Class>,
    // 任课的班级科目
    pub teaching: Vec<ClassSubject>,
}
