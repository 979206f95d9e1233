use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 会话管理方法
    async fn create_session(&self, session: NewSession) -> Result<Session>;
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>>;
    // 列出用户未过期的会话
    async fn list_user_sessions(&self, user_id: i64) -> Result<Vec<Session>>;
    async fn delete_session(&self, session_id: &str) -> Result<bool>;
    // 删除用户的全部会话，可保留一个
    async fn delete_user_sessions(&self, user_id: i64, keep: Option<&str>) -> Result<Vec<String>>;
    // 清理过期会话
    async fn purge_expired_sessions(&self) -> Result<u64>;

    /// 教师管理方法
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_employee_no(&self, employee_no: &str) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
    // 教师担任班主任的班级及任课安排
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<TeacherClassesResponse>;
    async fn count_teachers(&self) -> Result<u64>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    // 班级当前学生人数
    async fn count_class_students(&self, class_id: i64) -> Result<i64>;
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>>;
    async fn count_classes(&self) -> Result<u64>;

    /// 班级科目安排
    async fn list_class_subjects(&self, class_id: i64) -> Result<Vec<ClassSubject>>;
    async fn get_class_subject(
        &self,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Option<ClassSubject>>;
    // 按 (班级, 科目) 新增或更新任课教师
    async fn assign_subject(
        &self,
        class_id: i64,
        subject_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<ClassSubject>;
    async fn unassign_subject(&self, class_id: i64, subject_id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentWithClass>>;
    async fn get_student_by_admission_no(&self, admission_no: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 按筛选条件列出全部学生（导出用，不分页）
    async fn list_students_for_export(
        &self,
        query: StudentListQuery,
    ) -> Result<Vec<StudentWithClass>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_students(&self) -> Result<u64>;
    async fn count_students_by_gender(&self) -> Result<Vec<GenderCount>>;

    /// 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    async fn count_subjects(&self) -> Result<u64>;

    /// 考试管理方法
    async fn create_exam(&self, exam: CreateExamRequest, created_by: i64) -> Result<Exam>;
    async fn get_exam_by_id(&self, id: i64) -> Result<Option<ExamWithNames>>;
    async fn list_exams_with_pagination(&self, query: ExamListQuery) -> Result<ExamListResponse>;
    async fn update_exam(&self, id: i64, update: UpdateExamRequest) -> Result<Option<Exam>>;
    async fn delete_exam(&self, id: i64) -> Result<bool>;
    // 统计考试数量，可限定起始时间
    async fn count_exams(&self, since: Option<chrono::DateTime<chrono::Utc>>) -> Result<u64>;

    /// 成绩管理方法
    // 一次事务内录入整场考试的成绩
    async fn record_exam_results(
        &self,
        exam: &Exam,
        entries: Vec<ResultEntry>,
        recorded_by: i64,
    ) -> Result<RecordResultsResponse>;
    async fn list_exam_results(&self, exam_id: i64) -> Result<Vec<ResultDetail>>;
    async fn list_results_with_pagination(
        &self,
        query: ResultListQuery,
    ) -> Result<ResultListResponse>;
    async fn get_result_by_id(&self, id: i64) -> Result<Option<ExamResult>>;
    async fn delete_result(&self, id: i64) -> Result<bool>;
    // 某班级某学期的全部得分（成绩单计算用）
    async fn list_term_scores(&self, class_id: i64, term: &str) -> Result<Vec<ScoreRow>>;

    /// 收费管理方法
    async fn create_fee(&self, fee: CreateFeeRequest) -> Result<Fee>;
    async fn get_fee_by_id(&self, id: i64) -> Result<Option<FeeWithBalance>>;
    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse>;
    // 按筛选条件列出全部收费项（导出、汇总用）
    async fn list_fees_for_export(&self, query: FeeListQuery) -> Result<Vec<FeeWithBalance>>;
    async fn update_fee(&self, id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>>;
    async fn delete_fee(&self, id: i64) -> Result<bool>;
    async fn list_fee_payments(&self, fee_id: i64) -> Result<Vec<FeePayment>>;
    // 登记缴费，金额必须在 (0, 余额] 之间
    async fn record_payment(
        &self,
        fee_id: i64,
        payment: RecordPaymentRequest,
        received_by: i64,
    ) -> Result<FeePayment>;
    async fn fee_summary(&self, term: Option<String>) -> Result<FeeSummary>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
