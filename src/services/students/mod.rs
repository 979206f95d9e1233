pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, StudentExportParams, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, internal_error, not_found};
use crate::storage::Storage;

define_service!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        student: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, student, request).await
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        update: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, update, request).await
    }

    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }

    // 导出学生名单
    pub async fn export_students(
        &self,
        query: StudentExportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_students(self, query, request).await
    }
}

/// 确认班级还能再容纳一名在读学生
pub(crate) async fn ensure_class_has_room(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<(), HttpResponse> {
    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => return Err(internal_error("Failed to load class", e)),
    };

    let enrolled = storage
        .count_class_students(class_id)
        .await
        .map_err(|e| internal_error("Failed to count class students", e))?;

    if enrolled >= class.capacity as i64 {
        return Err(conflict(
            ErrorCode::ClassFull,
            format!(
                "Class {} is full ({}/{})",
                class.name, enrolled, class.capacity
            ),
        ));
    }
    Ok(())
}

/// 关联账号必须存在且角色正确
pub(crate) async fn ensure_linked_user(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    role: UserRole,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.role == role => Ok(()),
        Ok(Some(_)) => Err(bad_request(
            ErrorCode::BadRequest,
            format!("Linked user {user_id} must have role {role}"),
        )),
        Ok(None) => Err(not_found(ErrorCode::UserNotFound, "Linked user not found")),
        Err(e) => Err(internal_error("Failed to load linked user", e)),
    }
}

/// 学生的可选字段校验
pub(crate) fn validate_guardian_phone(phone: &Option<String>) -> Result<(), HttpResponse> {
    if let Some(phone) = phone
        && let Err(msg) = crate::utils::validate::validate_phone(phone.trim())
    {
        return Err(bad_request(ErrorCode::BadRequest, msg));
    }
    Ok(())
}

pub(crate) fn success<T: ts_rs::TS + serde::Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data, message))
}
