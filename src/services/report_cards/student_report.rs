use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportCardService, parse_term, retain_members};
use crate::models::report_cards::entities::ScoreRow;
use crate::models::report_cards::requests::ReportCardParams;
use crate::models::report_cards::responses::StudentReportCard;
use crate::models::students::entities::StudentWithClass;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found, student_scope};
use crate::utils::grading::{GradeScale, class_standings, overall_percentage, subject_reports};

/// 由班级成绩组装一名学生的成绩单；排名只在有成绩的同学之间进行
pub(crate) fn build_student_card(
    student: StudentWithClass,
    term: String,
    class_rows: &[ScoreRow],
    scale: &GradeScale,
) -> StudentReportCard {
    let student_id = student.student.id;
    let own: Vec<ScoreRow> = class_rows
        .iter()
        .filter(|row| row.student_id == student_id)
        .cloned()
        .collect();

    let subjects = subject_reports(&own, scale);
    let overall = overall_percentage(&subjects);
    let standings = class_standings(class_rows, scale);
    let position = standings
        .iter()
        .find(|s| s.student_id == student_id)
        .map(|s| s.position);

    StudentReportCard {
        student,
        term,
        subjects,
        overall_grade: overall.map(|pct| scale.grade_for(pct).grade.clone()),
        passed: overall.map(|pct| scale.passed(pct)),
        overall_percentage: overall,
        position,
        class_size: standings.len() as i64,
    }
}

pub async fn student_report(
    service: &ReportCardService,
    student_id: i64,
    query: ReportCardParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let term = match parse_term(query) {
        Ok(term) => term,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to load student", e)),
    };
    if !student_scope(&user).allows(&student.student) {
        return Ok(forbidden("You can only view your own report cards"));
    }

    let scale = GradeScale::current();

    // 未分班的学生没有可比较的成绩
    let Some(class_id) = student.student.class_id else {
        let card = build_student_card(student, term, &[], &scale);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(card, "ok")));
    };

    let mut rows = match storage.list_term_scores(class_id, &term).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to load term scores", e)),
    };
    let members: HashSet<i64> = match storage.list_class_students(class_id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(internal_error("Failed to load class students", e)),
    };
    retain_members(&mut rows, &members);

    let card = build_student_card(student, term, &rows, &scale);
    Ok(HttpResponse::Ok().json(ApiResponse::success(card, "ok")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradingConfig;
    use crate::models::common::Gender;
    use crate::models::students::entities::{Student, StudentStatus};

    fn student(id: i64) -> StudentWithClass {
        let now = chrono::Utc::now();
        StudentWithClass {
            student: Student {
                id,
                user_id: None,
                parent_id: None,
                class_id: Some(1),
                admission_no: format!("ADM-{id:03}"),
                first_name: "Test".to_string(),
                last_name: format!("Student{id}"),
                gender: Gender::Other,
                birthday: None,
                guardian_name: None,
                guardian_phone: None,
                address: None,
                status: StudentStatus::Active,
                enrolled_at: now,
                created_at: now,
                updated_at: now,
            },
            class_name: Some("Primary 4".to_string()),
        }
    }

    fn row(student_id: i64, subject_id: i64, score: f64) -> ScoreRow {
        ScoreRow {
            student_id,
            subject_id,
            subject_name: format!("Subject {subject_id}"),
            score,
            max_score: 100.0,
            weight: 1.0,
        }
    }

    fn scale() -> GradeScale {
        GradeScale::from_config(&GradingConfig::default())
    }

    #[test]
    fn test_student_card_ranks_against_classmates() {
        let rows = vec![
            row(1, 1, 80.0),
            row(1, 2, 60.0),
            row(2, 1, 90.0),
            row(2, 2, 90.0),
            row(3, 1, 70.0),
            row(3, 2, 70.0),
        ];
        let card = build_student_card(student(1), "2025-T1".to_string(), &rows, &scale());

        assert_eq!(card.subjects.len(), 2);
        assert_eq!(card.overall_percentage, Some(70.0));
        // 1 号与 3 号总评相同，并列第二
        assert_eq!(card.position, Some(2));
        assert_eq!(card.class_size, 3);
        assert!(card.overall_grade.is_some());
    }

    #[test]
    fn test_student_without_results_has_no_position() {
        let rows = vec![row(2, 1, 90.0)];
        let card = build_student_card(student(5), "2025-T1".to_string(), &rows, &scale());

        assert!(card.subjects.is_empty());
        assert_eq!(card.overall_percentage, None);
        assert_eq!(card.overall_grade, None);
        assert_eq!(card.passed, None);
        assert_eq!(card.position, None);
        assert_eq!(card.class_size, 1);
    }
}
