//! 数据模型定义
//!
//! 每个业务模块分为 `entities`（业务实体）、`requests`（请求参数）、
//! `responses`（响应体）三部分。

pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod exams;
pub mod fees;
pub mod report_cards;
pub mod results;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证 / 会话
    AuthFailed = 2000,
    SessionExpired = 2001,
    AccountInactive = 2002,
    PasswordMismatch = 2003,

    // 用户
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserAlreadyExists = 3004,
    CanNotDeleteCurrentUser = 3005,

    // 教师 / 学生 / 班级 / 科目
    TeacherNotFound = 4000,
    StudentNotFound = 4100,
    ClassNotFound = 4200,
    ClassFull = 4201,
    SubjectNotFound = 4300,
    SubjectNotAssigned = 4301,

    // 考试 / 成绩
    ExamNotFound = 5000,
    ScoreOutOfRange = 5001,
    StudentNotInClass = 5002,
    ResultNotFound = 5003,

    // 学费
    FeeNotFound = 6000,
    PaymentInvalid = 6001,

    // 导出
    ExportFailed = 7000,
}
