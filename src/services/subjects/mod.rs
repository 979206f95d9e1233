pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectQueryParams, UpdateSubjectRequest,
};

define_service!(SubjectService);

impl SubjectService {
    pub async fn list_subjects(
        &self,
        query: SubjectQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_subjects(self, query, request).await
    }

    pub async fn create_subject(
        &self,
        subject: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_subject(self, subject, request).await
    }

    pub async fn get_subject(
        &self,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_subject(self, subject_id, request).await
    }

    pub async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_subject(self, subject_id, update, request).await
    }

    pub async fn delete_subject(
        &self,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_subject(self, subject_id, request).await
    }
}

/// 科目代码统一为去空白后的大写形式
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_code;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  math-101 "), "MATH-101");
        assert_eq!(normalize_code("ENG"), "ENG");
    }
}
