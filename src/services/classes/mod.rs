pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod subjects;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::classes::entities::Class;
use crate::models::classes::requests::{
    AssignSubjectRequest, ClassQueryParams, CreateClassRequest, UpdateClassRequest,
};
use crate::services::{internal_error, not_found};
use crate::storage::Storage;

define_service!(ClassService);

impl ClassService {
    pub async fn list_classes(
        &self,
        query: ClassQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, query, request).await
    }

    pub async fn create_class(
        &self,
        class_data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, class_data, request).await
    }

    pub async fn get_class(&self, class_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_class(self, class_id, request).await
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, class_id, update, request).await
    }

    pub async fn delete_class(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, class_id, request).await
    }

    // 班级在读学生
    pub async fn list_class_students(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_class_students(self, class_id, request).await
    }

    // 为班级安排科目与任课教师
    pub async fn assign_subject(
        &self,
        class_id: i64,
        assignment: AssignSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::assign_subject(self, class_id, assignment, request).await
    }

    pub async fn unassign_subject(
        &self,
        class_id: i64,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::unassign_subject(self, class_id, subject_id, request).await
    }
}

/// 加载班级，不存在时返回 404
pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Err(internal_error("Failed to load class", e)),
    }
}

/// 班主任必须是已存在的教师
pub(crate) async fn ensure_teacher_exists(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
        Err(e) => Err(internal_error("Failed to load teacher", e)),
    }
}
