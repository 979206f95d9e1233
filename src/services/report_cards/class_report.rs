use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportCardService, parse_term, retain_members};
use crate::models::ApiResponse;
use crate::models::report_cards::entities::ScoreRow;
use crate::models::report_cards::requests::ReportCardParams;
use crate::models::report_cards::responses::{ClassReportCard, ClassReportRow};
use crate::models::students::entities::Student;
use crate::services::classes::load_class;
use crate::services::internal_error;
use crate::utils::grading::{GradeScale, class_standings};

/// 按名次排列的班级汇总行，没有成绩的学生不出现
pub(crate) fn build_class_rows(
    students: &[Student],
    rows: &[ScoreRow],
    scale: &GradeScale,
) -> Vec<ClassReportRow> {
    let by_id: HashMap<i64, &Student> = students.iter().map(|s| (s.id, s)).collect();

    class_standings(rows, scale)
        .into_iter()
        .filter_map(|standing| {
            let student = by_id.get(&standing.student_id)?;
            Some(ClassReportRow {
                student_id: standing.student_id,
                student_name: student.full_name(),
                admission_no: student.admission_no.clone(),
                overall_percentage: standing.overall_percentage,
                grade: scale.grade_for(standing.overall_percentage).grade.clone(),
                passed: scale.passed(standing.overall_percentage),
                position: standing.position,
            })
        })
        .collect()
}

pub async fn class_report(
    service: &ReportCardService,
    class_id: i64,
    query: ReportCardParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let term = match parse_term(query) {
        Ok(term) => term,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let class = match load_class(&storage, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    let students = match storage.list_class_students(class_id).await {
        Ok(students) => students,
        Err(e) => return Ok(internal_error("Failed to load class students", e)),
    };
    let mut rows = match storage.list_term_scores(class_id, &term).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to load term scores", e)),
    };
    let members: HashSet<i64> = students.iter().map(|s| s.id).collect();
    retain_members(&mut rows, &members);

    let report = ClassReportCard {
        rows: build_class_rows(&students, &rows, &GradeScale::current()),
        class,
        term,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "ok")))
}
