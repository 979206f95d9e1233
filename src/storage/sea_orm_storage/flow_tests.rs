//! 基于内存 SQLite 的存储层流程测试

use chrono::{Duration, Utc};

use super::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::models::auth::entities::NewSession;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::common::Gender;
use crate::models::exams::{entities::Exam, requests::CreateExamRequest, requests::ResultEntry};
use crate::models::fees::entities::{FeeStatus, PaymentMethod};
use crate::models::fees::requests::{CreateFeeRequest, FeeListQuery, RecordPaymentRequest};
use crate::models::students::entities::{Student, StudentStatus};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, StudentScope, UpdateStudentRequest,
};
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .unwrap()
}

async fn user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@school.test"),
            password: "hash".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

async fn class(storage: &SeaOrmStorage, name: &str, capacity: i32) -> i64 {
    storage
        .create_class(CreateClassRequest {
            name: name.to_string(),
            grade_level: 7,
            capacity,
            supervisor_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn student(
    storage: &SeaOrmStorage,
    admission_no: &str,
    class_id: Option<i64>,
    parent_id: Option<i64>,
) -> Student {
    storage
        .create_student(CreateStudentRequest {
            user_id: None,
            parent_id,
            class_id,
            admission_no: admission_no.to_string(),
            first_name: "Ada".to_string(),
            last_name: admission_no.to_string(),
            gender: Gender::Female,
            birthday: None,
            guardian_name: None,
            guardian_phone: None,
            address: None,
        })
        .await
        .unwrap()
}

async fn exam(storage: &SeaOrmStorage, class_id: i64, created_by: i64) -> Exam {
    let subject = storage
        .create_subject(CreateSubjectRequest {
            name: "Mathematics".to_string(),
            code: "MATH".to_string(),
            description: None,
        })
        .await
        .unwrap();
    storage
        .create_exam(
            CreateExamRequest {
                class_id,
                subject_id: subject.id,
                title: "Midterm".to_string(),
                term: "2025-T1".to_string(),
                exam_date: Utc::now() - Duration::days(2),
                max_score: 50.0,
                weight: None,
            },
            created_by,
        )
        .await
        .unwrap()
}

fn entry(student_id: i64, score: f64) -> ResultEntry {
    ResultEntry {
        student_id,
        score,
        remark: None,
    }
}

#[tokio::test]
async fn test_class_capacity_counts_active_students_only() {
    let storage = storage().await;
    let class_id = class(&storage, "7A", 30).await;

    let first = student(&storage, "S001", Some(class_id), None).await;
    student(&storage, "S002", Some(class_id), None).await;
    assert_eq!(storage.count_class_students(class_id).await.unwrap(), 2);

    storage
        .update_student(
            first.id,
            UpdateStudentRequest {
                status: Some(StudentStatus::Graduated),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(storage.count_class_students(class_id).await.unwrap(), 1);
    // 毕业学生仍然列在班级名单中
    assert_eq!(storage.list_class_students(class_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_student_scope_filters_list() {
    let storage = storage().await;
    let parent = user(&storage, "parent", UserRole::Parent).await;
    student(&storage, "S001", None, Some(parent.id)).await;
    student(&storage, "S002", None, None).await;

    let all = storage
        .list_students_for_export(StudentListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let own = storage
        .list_students_for_export(StudentListQuery {
            scope: StudentScope::ParentOf(parent.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].student.admission_no, "S001");
}

#[tokio::test]
async fn test_record_results_upserts_and_rolls_back_outsiders() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let class_id = class(&storage, "7A", 30).await;
    let other_class = class(&storage, "7B", 30).await;
    let a = student(&storage, "S001", Some(class_id), None).await;
    let b = student(&storage, "S002", Some(class_id), None).await;
    let outsider = student(&storage, "S003", Some(other_class), None).await;
    let exam = exam(&storage, class_id, teacher.id).await;

    let summary = storage
        .record_exam_results(&exam, vec![entry(a.id, 40.0), entry(b.id, 25.0)], teacher.id)
        .await
        .unwrap();
    assert_eq!((summary.inserted, summary.updated), (2, 0));

    let summary = storage
        .record_exam_results(&exam, vec![entry(a.id, 45.0)], teacher.id)
        .await
        .unwrap();
    assert_eq!((summary.inserted, summary.updated), (0, 1));

    // 混入外班学生时整批不生效
    let err = storage
        .record_exam_results(&exam, vec![entry(b.id, 10.0), entry(outsider.id, 30.0)], teacher.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let results = storage.list_exam_results(exam.id).await.unwrap();
    assert_eq!(results.len(), 2);
    let score_of = |id: i64| {
        results
            .iter()
            .find(|r| r.result.student_id == id)
            .map(|r| r.result.score)
    };
    assert_eq!(score_of(a.id), Some(45.0));
    assert_eq!(score_of(b.id), Some(25.0));

    let rows = storage.list_term_scores(class_id, "2025-T1").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.max_score == 50.0 && r.weight == 1.0));
    assert!(storage.list_term_scores(class_id, "2025-T2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fee_payments_track_balance() {
    let storage = storage().await;
    let clerk = user(&storage, "bursar", UserRole::Admin).await;
    let s = student(&storage, "S001", None, None).await;

    let fee = storage
        .create_fee(CreateFeeRequest {
            student_id: s.id,
            title: "Tuition".to_string(),
            term: "2025-T1".to_string(),
            amount_cents: 10_000,
            due_date: Utc::now() + Duration::days(30),
        })
        .await
        .unwrap();

    let pay = |amount_cents| RecordPaymentRequest {
        amount_cents,
        method: PaymentMethod::Cash,
        reference: None,
    };

    storage.record_payment(fee.id, pay(4_000), clerk.id).await.unwrap();
    let current = storage.get_fee_by_id(fee.id).await.unwrap().unwrap();
    assert_eq!(current.paid_cents, 4_000);
    assert_eq!(current.balance_cents, 6_000);
    assert_eq!(current.status, FeeStatus::Partial);

    // 超过余额和非正数金额都拒绝
    assert!(storage.record_payment(fee.id, pay(6_001), clerk.id).await.is_err());
    assert!(storage.record_payment(fee.id, pay(0), clerk.id).await.is_err());
    assert_eq!(
        storage.record_payment(9_999, pay(100), clerk.id).await.unwrap_err().code(),
        "E007"
    );

    storage.record_payment(fee.id, pay(6_000), clerk.id).await.unwrap();
    let current = storage.get_fee_by_id(fee.id).await.unwrap().unwrap();
    assert_eq!(current.status, FeeStatus::Paid);
    assert_eq!(storage.list_fee_payments(fee.id).await.unwrap().len(), 2);

    let paid_only = storage
        .list_fees_for_export(FeeListQuery {
            status: Some(FeeStatus::Paid),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paid_only.len(), 1);

    let summary = storage.fee_summary(Some("2025-T1".to_string())).await.unwrap();
    assert_eq!(summary.billed_cents, 10_000);
    assert_eq!(summary.collected_cents, 10_000);
    assert_eq!(summary.outstanding_cents, 0);
    assert_eq!(summary.paid_count, 1);
}

#[tokio::test]
async fn test_sessions_delete_keep_and_purge() {
    let storage = storage().await;
    let u = user(&storage, "alice", UserRole::Teacher).await;

    let new_session = |id: &str, expires_in: Duration| NewSession {
        id: id.to_string(),
        user_id: u.id,
        remember_me: false,
        ip_address: None,
        user_agent: None,
        expires_at: Utc::now() + expires_in,
    };

    storage.create_session(new_session("current", Duration::hours(1))).await.unwrap();
    storage.create_session(new_session("laptop", Duration::hours(1))).await.unwrap();
    storage.create_session(new_session("stale", -Duration::hours(1))).await.unwrap();

    let live = storage.list_user_sessions(u.id).await.unwrap();
    assert_eq!(live.len(), 2);

    assert_eq!(storage.purge_expired_sessions().await.unwrap(), 1);

    let mut removed = storage.delete_user_sessions(u.id, Some("current")).await.unwrap();
    removed.sort();
    assert_eq!(removed, vec!["laptop".to_string()]);
    assert!(storage.get_session("current").await.unwrap().is_some());
    assert!(storage.get_session("laptop").await.unwrap().is_none());
}

#[tokio::test]
async fn test_recent_exam_count_and_gender_breakdown() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let class_id = class(&storage, "7A", 30).await;
    student(&storage, "S001", Some(class_id), None).await;
    exam(&storage, class_id, teacher.id).await;

    assert_eq!(storage.count_exams(None).await.unwrap(), 1);
    assert_eq!(
        storage
            .count_exams(Some(Utc::now() - Duration::days(30)))
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        storage
            .count_exams(Some(Utc::now() - Duration::days(1)))
            .await
            .unwrap(),
        0
    );

    let genders = storage.count_students_by_gender().await.unwrap();
    assert_eq!(genders.len(), 1);
    assert_eq!(genders[0].count, 1);
}
