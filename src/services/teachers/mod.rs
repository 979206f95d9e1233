pub mod classes;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherQueryParams, UpdateTeacherRequest,
};

define_service!(TeacherService);

impl TeacherService {
    pub async fn list_teachers(
        &self,
        query: TeacherQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, query, request).await
    }

    pub async fn create_teacher(
        &self,
        teacher: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, teacher, request).await
    }

    pub async fn get_teacher(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_teacher(self, teacher_id, request).await
    }

    pub async fn update_teacher(
        &self,
        teacher_id: i64,
        update: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, teacher_id, update, request).await
    }

    pub async fn delete_teacher(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, teacher_id, request).await
    }

    // 教师的班主任班级与任课安排
    pub async fn teacher_classes(
        &self,
        teacher_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        classes::teacher_classes(self, teacher_id, request).await
    }
}

/// 可选联系方式的校验，通过后返回去掉首尾空白的值
pub(crate) fn normalize_contact(
    email: Option<String>,
    phone: Option<String>,
) -> Result<(Option<String>, Option<String>), &'static str> {
    let email = email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let phone = phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    if let Some(ref email) = email {
        crate::utils::validate::validate_email(email)?;
    }
    if let Some(ref phone) = phone {
        crate::utils::validate::validate_phone(phone)?;
    }
    Ok((email, phone))
}

#[cfg(test)]
mod tests {
    use super::normalize_contact;

    #[test]
    fn test_normalize_contact_trims_and_drops_blank() {
        let (email, phone) =
            normalize_contact(Some("  Jane@School.Test ".into()), Some("   ".into())).unwrap();
        assert_eq!(email.as_deref(), Some("jane@school.test"));
        assert_eq!(phone, None);
    }

    #[test]
    fn test_normalize_contact_rejects_bad_phone() {
        assert!(normalize_contact(None, Some("call me".into())).is_err());
    }
}
