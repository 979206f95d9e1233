//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间统一以 Unix 秒存储，日期以 `YYYY-MM-DD` 字符串存储。

pub mod prelude;

pub mod class_subjects;
pub mod classes;
pub mod exam_results;
pub mod exams;
pub mod fee_payments;
pub mod fees;
pub mod sessions;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

pub(crate) fn parse_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok())
}

pub(crate) fn format_date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format(DATE_FORMAT).to_string())
}
