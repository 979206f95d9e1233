use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 年级
    pub grade_level: i32,
    // 容量
    pub capacity: i32,
    // 班主任（教师ID）
    pub supervisor_id: Option<i64>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级列表项：带学生人数和班主任姓名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_count: i64,
    pub supervisor_name: Option<String>,
}

// 班级科目安排
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassSubject {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub subject_code: String,
    pub teacher_id: Option<i64>,
    pub teacher_name: Option<String>,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}
