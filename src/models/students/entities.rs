use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::Gender;

// 学籍状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum StudentStatus {
    Active,    // 在读
    Graduated, // 毕业
    Withdrawn, // 退学
}

impl<'de> Deserialize<'de> for StudentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<StudentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的学籍状态: '{s}'. 支持的状态: active, graduated, withdrawn"
            ))
        })
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Active => write!(f, "active"),
            StudentStatus::Graduated => write!(f, "graduated"),
            StudentStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StudentStatus::Active),
            "graduated" => Ok(StudentStatus::Graduated),
            "withdrawn" => Ok(StudentStatus::Withdrawn),
            _ => Err(format!("Invalid student status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    // 学生本人的登录账号
    pub user_id: Option<i64>,
    // 家长的登录账号
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    // 学号
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birthday: Option<chrono::NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub status: StudentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// 学生列表项 / 详情，附带班级名称
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentWithClass {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub class_name: Option<String>,
}
