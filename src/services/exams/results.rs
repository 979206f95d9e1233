use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, load_exam};
use crate::errors::SchoolDeskError;
use crate::models::exams::requests::{RecordResultsRequest, ResultEntry};
use crate::models::students::requests::{StudentListQuery, StudentScope};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, csv_response, current_user, internal_error, student_scope};
use crate::utils::validate::validate_score;

/// 校验一批成绩：不能为空，分数在范围内，同一学生只出现一次
pub(crate) fn check_entries(entries: &[ResultEntry], max_score: f64) -> Result<(), HttpResponse> {
    if entries.is_empty() {
        return Err(bad_request(ErrorCode::BadRequest, "No results submitted"));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if let Err(msg) = validate_score(entry.score, max_score) {
            return Err(bad_request(
                ErrorCode::ScoreOutOfRange,
                format!("Student {}: {msg}", entry.student_id),
            ));
        }
        if !seen.insert(entry.student_id) {
            return Err(bad_request(
                ErrorCode::BadRequest,
                format!("Student {} appears more than once", entry.student_id),
            ));
        }
    }
    Ok(())
}

pub async fn list_results(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = load_exam(&storage, exam_id).await {
        return Ok(resp);
    }

    let mut rows = match storage.list_exam_results(exam_id).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to list exam results", e)),
    };

    // 学生和家长只能看到自己（孩子）的成绩
    let scope = student_scope(&user);
    if scope != StudentScope::All {
        let visible: HashSet<i64> = match storage
            .list_students_for_export(StudentListQuery {
                scope,
                ..Default::default()
            })
            .await
        {
            Ok(students) => students.into_iter().map(|s| s.student.id).collect(),
            Err(e) => return Ok(internal_error("Failed to list exam results", e)),
        };
        rows.retain(|row| visible.contains(&row.result.student_id));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(rows, "ok")))
}

pub async fn record_results(
    service: &ExamService,
    exam_id: i64,
    body: RecordResultsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let exam = match load_exam(&storage, exam_id).await {
        Ok(found) => found.exam,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = check_entries(&body.results, exam.max_score) {
        return Ok(resp);
    }

    match storage
        .record_exam_results(&exam, body.results, user.id)
        .await
    {
        Ok(summary) => {
            info!(
                "Recorded results for exam {}: {} inserted, {} updated",
                exam.id, summary.inserted, summary.updated
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Results recorded")))
        }
        Err(SchoolDeskError::Validation(msg)) => {
            Ok(bad_request(ErrorCode::StudentNotInClass, msg))
        }
        Err(e) => Ok(internal_error("Failed to record results", e)),
    }
}

pub async fn export_results(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_exam(&storage, exam_id).await {
        return Ok(resp);
    }

    match storage.list_exam_results(exam_id).await {
        Ok(rows) => Ok(csv_response(&format!("exam-{exam_id}-results.csv"), &rows)),
        Err(e) => Ok(internal_error("Failed to export exam results", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn entry(student_id: i64, score: f64) -> ResultEntry {
        ResultEntry {
            student_id,
            score,
            remark: None,
        }
    }

    #[test]
    fn test_entries_within_range_pass() {
        let entries = vec![entry(1, 0.0), entry(2, 50.0), entry(3, 100.0)];
        assert!(check_entries(&entries, 100.0).is_ok());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let resp = check_entries(&[], 100.0).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_score_above_max_rejected() {
        assert!(check_entries(&[entry(1, 100.5)], 100.0).is_err());
        assert!(check_entries(&[entry(1, -1.0)], 100.0).is_err());
    }

    #[test]
    fn test_duplicate_student_rejected() {
        assert!(check_entries(&[entry(4, 10.0), entry(4, 20.0)], 50.0).is_err());
    }
}
