use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::{error, info};

use crate::cache::ObjectCache;
use crate::errors::SchoolDeskError;
use crate::middlewares::RequireSession;
use crate::models::students::requests::StudentScope;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::export::{CsvRow, csv_attachment, write_csv};

/// 生成服务结构体：存储从 app_data 中懒加载，测试时可以直接注入
macro_rules! define_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn $crate::storage::Storage> {
                if let Some(storage) = &self.storage {
                    storage.clone()
                } else {
                    request
                        .app_data::<actix_web::web::Data<std::sync::Arc<dyn $crate::storage::Storage>>>()
                        .expect("Storage not found in app data")
                        .get_ref()
                        .clone()
                }
            }
        }
    };
}

pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod exams;
pub mod fees;
pub mod report_cards;
pub mod results;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

#[cfg(test)]
mod flow_tests;

pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use exams::ExamService;
pub use fees::FeeService;
pub use report_cards::ReportCardService;
pub use results::ResultService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use teachers::TeacherService;
pub use users::UserService;

/// 当前用户能看到的学生范围
pub fn student_scope(user: &User) -> StudentScope {
    match user.role {
        UserRole::Admin | UserRole::Teacher => StudentScope::All,
        UserRole::Student => StudentScope::SelfUser(user.id),
        UserRole::Parent => StudentScope::ParentOf(user.id),
    }
}

/// 取出当前登录用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireSession::extract_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })
}

pub(crate) fn get_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}

/// 记录日志并返回 500
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    ))
}

/// 存储层错误转换为响应；唯一约束冲突视为 409
pub(crate) fn storage_error(context: &str, err: SchoolDeskError) -> HttpResponse {
    match err {
        SchoolDeskError::NotFound(msg) => not_found(ErrorCode::NotFound, msg),
        SchoolDeskError::Validation(msg) => bad_request(ErrorCode::BadRequest, msg),
        SchoolDeskError::Conflict(msg) => conflict(ErrorCode::Conflict, msg),
        SchoolDeskError::DatabaseOperation(msg) if is_unique_violation(&msg) => {
            conflict(ErrorCode::Conflict, format!("{context}: record already exists"))
        }
        other => internal_error(context, other),
    }
}

fn is_unique_violation(message: &str) -> bool {
    message.contains("UNIQUE constraint failed")
        || message.contains("duplicate key")
        || message.contains("Duplicate entry")
}

/// 生成 CSV 附件，失败时返回 ExportFailed
pub(crate) fn csv_response<R: CsvRow>(filename: &str, rows: &[R]) -> HttpResponse {
    match write_csv(rows) {
        Ok(data) => {
            info!("Exported {} rows to {}", rows.len(), filename);
            csv_attachment(filename, data)
        }
        Err(e) => {
            error!("CSV export {} failed: {}", filename, e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExportFailed,
                format!("Export failed: {e}"),
            ))
        }
    }
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let resp = storage_error(
            "Create teacher failed",
            SchoolDeskError::database_operation("UNIQUE constraint failed: teachers.user_id"),
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

        let resp = storage_error("Load", SchoolDeskError::database_operation("disk I/O error"));
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_student_scope_by_role() {
        assert_eq!(student_scope(&user(1, UserRole::Admin)), StudentScope::All);
        assert_eq!(student_scope(&user(2, UserRole::Teacher)), StudentScope::All);
        assert_eq!(
            student_scope(&user(3, UserRole::Student)),
            StudentScope::SelfUser(3)
        );
        assert_eq!(
            student_scope(&user(4, UserRole::Parent)),
            StudentScope::ParentOf(4)
        );
    }
}
