use super::entities::StudentStatus;
use crate::models::common::{Gender, PaginationQuery, deserialize_optional_number};
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub class_id: Option<i64>,
    pub status: Option<StudentStatus>,
}

// 导出条件，与列表筛选相同但不分页
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentExportParams {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub class_id: Option<i64>,
    pub status: Option<StudentStatus>,
}

// 创建学生请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub user_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birthday: Option<chrono::NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
}

// 更新学生请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub user_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birthday: Option<chrono::NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<StudentStatus>,
}

// 学生可见范围（用于存储层）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentScope {
    // 教职工：全部学生
    All,
    // 学生本人：user_id 匹配
    SelfUser(i64),
    // 家长：parent_id 匹配
    ParentOf(i64),
}

impl StudentScope {
    /// 该范围内是否包含指定学生
    pub fn allows(&self, student: &super::entities::Student) -> bool {
        match self {
            StudentScope::All => true,
            StudentScope::SelfUser(user_id) => student.user_id == Some(*user_id),
            StudentScope::ParentOf(user_id) => student.parent_id == Some(*user_id),
        }
    }
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub class_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub scope: StudentScope,
}

impl Default for StudentListQuery {
    fn default() -> Self {
        Self {
            page: None,
            size: None,
            search: None,
            class_id: None,
            status: None,
            scope: StudentScope::All,
        }
    }
}
