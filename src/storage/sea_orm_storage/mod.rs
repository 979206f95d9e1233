//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod classes;
mod exams;
mod fees;
mod results;
mod sessions;
mod students;
mod subjects;
mod teachers;
mod users;

#[cfg(test)]
mod flow_tests;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{Result, SchoolDeskError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 按给定数据库配置连接并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolDeskError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolDeskError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存数据库每个连接各自独立，只能使用单连接且不能被回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolDeskError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(5.min(config.pool_size))
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolDeskError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolDeskError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 分页参数归一化：页码从 1 开始，每页 1~100 条
pub(crate) fn normalize_page(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(10).clamp(1, 100) as u64;
    (page, size)
}

// Storage trait 实现
use crate::models::{
    auth::entities::{NewSession, Session},
    classes::{
        entities::{Class, ClassSubject},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    dashboard::responses::GenderCount,
    exams::{
        entities::{Exam, ExamWithNames},
        requests::{CreateExamRequest, ExamListQuery, ResultEntry, UpdateExamRequest},
        responses::{ExamListResponse, RecordResultsResponse},
    },
    fees::{
        entities::{Fee, FeePayment, FeeWithBalance},
        requests::{CreateFeeRequest, FeeListQuery, RecordPaymentRequest, UpdateFeeRequest},
        responses::{FeeListResponse, FeeSummary},
    },
    report_cards::entities::ScoreRow,
    results::{
        entities::{ExamResult, ResultDetail},
        requests::ResultListQuery,
        responses::ResultListResponse,
    },
    students::{
        entities::{Student, StudentWithClass},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::{TeacherClassesResponse, TeacherListResponse},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn create_session(&self, session: NewSession) -> Result<Session> {
        self.create_session_impl(session).await
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        self.get_session_impl(session_id).await
    }

    async fn list_user_sessions(&self, user_id: i64) -> Result<Vec<Session>> {
        self.list_user_sessions_impl(user_id).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool> {
        self.delete_session_impl(session_id).await
    }

    async fn delete_user_sessions(&self, user_id: i64, keep: Option<&str>) -> Result<Vec<String>> {
        self.delete_user_sessions_impl(user_id, keep).await
    }

    async fn purge_expired_sessions(&self) -> Result<u64> {
        self.purge_expired_sessions_impl().await
    }

    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_employee_no(&self, employee_no: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_employee_no_impl(employee_no).await
    }

    async fn list_teachers_with_pagination(&self, query: TeacherListQuery) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(&self, id: i64, update: UpdateTeacherRequest) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<TeacherClassesResponse> {
        self.list_teacher_classes_impl(teacher_id).await
    }

    async fn count_teachers(&self) -> Result<u64> {
        self.count_teachers_impl().await
    }

    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>> {
        self.get_class_by_name_impl(name).await
    }

    async fn list_classes_with_pagination(&self, query: ClassListQuery) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(&self, class_id: i64, update: UpdateClassRequest) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn count_class_students(&self, class_id: i64) -> Result<i64> {
        self.count_class_students_impl(class_id).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_class_students_impl(class_id).await
    }

    async fn count_classes(&self) -> Result<u64> {
        self.count_classes_impl().await
    }

    async fn list_class_subjects(&self, class_id: i64) -> Result<Vec<ClassSubject>> {
        self.list_class_subjects_impl(class_id).await
    }

    async fn get_class_subject(&self, class_id: i64, subject_id: i64) -> Result<Option<ClassSubject>> {
        self.get_class_subject_impl(class_id, subject_id).await
    }

    async fn assign_subject(&self, class_id: i64, subject_id: i64, teacher_id: Option<i64>) -> Result<ClassSubject> {
        self.assign_subject_impl(class_id, subject_id, teacher_id).await
    }

    async fn unassign_subject(&self, class_id: i64, subject_id: i64) -> Result<bool> {
        self.unassign_subject_impl(class_id, subject_id).await
    }

    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentWithClass>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_admission_no(&self, admission_no: &str) -> Result<Option<Student>> {
        self.get_student_by_admission_no_impl(admission_no).await
    }

    async fn list_students_with_pagination(&self, query: StudentListQuery) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_students_for_export(&self, query: StudentListQuery) -> Result<Vec<StudentWithClass>> {
        self.list_students_for_export_impl(query).await
    }

    async fn update_student(&self, id: i64, update: UpdateStudentRequest) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn count_students(&self) -> Result<u64> {
        self.count_students_impl().await
    }

    async fn count_students_by_gender(&self) -> Result<Vec<GenderCount>> {
        self.count_students_by_gender_impl().await
    }

    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn list_subjects_with_pagination(&self, query: SubjectListQuery) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn count_subjects(&self) -> Result<u64> {
        self.count_subjects_impl().await
    }

    async fn create_exam(&self, exam: CreateExamRequest, created_by: i64) -> Result<Exam> {
        self.create_exam_impl(exam, created_by).await
    }

    async fn get_exam_by_id(&self, id: i64) -> Result<Option<ExamWithNames>> {
        self.get_exam_by_id_impl(id).await
    }

    async fn list_exams_with_pagination(&self, query: ExamListQuery) -> Result<ExamListResponse> {
        self.list_exams_with_pagination_impl(query).await
    }

    async fn update_exam(&self, id: i64, update: UpdateExamRequest) -> Result<Option<Exam>> {
        self.update_exam_impl(id, update).await
    }

    async fn delete_exam(&self, id: i64) -> Result<bool> {
        self.delete_exam_impl(id).await
    }

    async fn count_exams(&self, since: Option<chrono::DateTime<chrono::Utc>>) -> Result<u64> {
        self.count_exams_impl(since).await
    }

    async fn record_exam_results(&self, exam: &Exam, entries: Vec<ResultEntry>, recorded_by: i64) -> Result<RecordResultsResponse> {
        self.record_exam_results_impl(exam, entries, recorded_by).await
    }

    async fn list_exam_results(&self, exam_id: i64) -> Result<Vec<ResultDetail>> {
        self.list_exam_results_impl(exam_id).await
    }

    async fn list_results_with_pagination(&self, query: ResultListQuery) -> Result<ResultListResponse> {
        self.list_results_with_pagination_impl(query).await
    }

    async fn get_result_by_id(&self, id: i64) -> Result<Option<ExamResult>> {
        self.get_result_by_id_impl(id).await
    }

    async fn delete_result(&self, id: i64) -> Result<bool> {
        self.delete_result_impl(id).await
    }

    async fn list_term_scores(&self, class_id: i64, term: &str) -> Result<Vec<ScoreRow>> {
        self.list_term_scores_impl(class_id, term).await
    }

    async fn create_fee(&self, fee: CreateFeeRequest) -> Result<Fee> {
        self.create_fee_impl(fee).await
    }

    async fn get_fee_by_id(&self, id: i64) -> Result<Option<FeeWithBalance>> {
        self.get_fee_by_id_impl(id).await
    }

    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse> {
        self.list_fees_with_pagination_impl(query).await
    }

    async fn list_fees_for_export(&self, query: FeeListQuery) -> Result<Vec<FeeWithBalance>> {
        self.list_fees_for_export_impl(query).await
    }

    async fn update_fee(&self, id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>> {
        self.update_fee_impl(id, update).await
    }

    async fn delete_fee(&self, id: i64) -> Result<bool> {
        self.delete_fee_impl(id).await
    }

    async fn list_fee_payments(&self, fee_id: i64) -> Result<Vec<FeePayment>> {
        self.list_fee_payments_impl(fee_id).await
    }

    async fn record_payment(&self, fee_id: i64, payment: RecordPaymentRequest, received_by: i64) -> Result<FeePayment> {
        self.record_payment_impl(fee_id, payment, received_by).await
    }

    async fn fee_summary(&self, term: Option<String>) -> Result<FeeSummary> {
        self.fee_summary_impl(term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("school.db").unwrap(),
            "sqlite://school.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/school").unwrap(),
            "postgres://u:p@localhost/school"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None, None), (1, 10));
        assert_eq!(normalize_page(Some(0), Some(1000)), (1, 100));
        assert_eq!(normalize_page(Some(3), Some(0)), (3, 1));
    }
}
