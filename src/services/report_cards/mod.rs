pub mod class_report;
pub mod student_report;

use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::report_cards::entities::ScoreRow;
use crate::models::report_cards::requests::ReportCardParams;
use crate::models::ErrorCode;
use crate::services::bad_request;
use crate::utils::validate::validate_term;

define_service!(ReportCardService);

impl ReportCardService {
    // 学生学期成绩单
    pub async fn student_report(
        &self,
        student_id: i64,
        query: ReportCardParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student_report::student_report(self, student_id, query, request).await
    }

    // 班级学期成绩汇总
    pub async fn class_report(
        &self,
        class_id: i64,
        query: ReportCardParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_report::class_report(self, class_id, query, request).await
    }
}

pub(crate) fn parse_term(query: ReportCardParams) -> Result<String, HttpResponse> {
    validate_term(&query.term).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    Ok(query.term.trim().to_string())
}

/// 只保留当前仍在班级中的学生的成绩
pub(crate) fn retain_members(rows: &mut Vec<ScoreRow>, members: &HashSet<i64>) {
    rows.retain(|row| members.contains(&row.student_id));
}
