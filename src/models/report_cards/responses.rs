use super::entities::SubjectReport;
use crate::models::classes::entities::Class;
use crate::models::students::entities::StudentWithClass;
use serde::Serialize;
use ts_rs::TS;

// 学生成绩单
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report-card.ts")]
pub struct StudentReportCard {
    pub student: StudentWithClass,
    pub term: String,
    pub subjects: Vec<SubjectReport>,
    pub overall_percentage: Option<f64>,
    pub overall_grade: Option<String>,
    pub passed: Option<bool>,
    // 班级排名，没有成绩时为空
    pub position: Option<i64>,
    // 参与排名的人数
    pub class_size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report-card.ts")]
pub struct ClassReportRow {
    pub student_id: i64,
    pub student_name: String,
    pub admission_no: String,
    pub overall_percentage: f64,
    pub grade: String,
    pub passed: bool,
    pub position: i64,
}

// 班级成绩汇总
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report-card.ts")]
pub struct ClassReportCard {
    pub class: Class,
    pub term: String,
    pub rows: Vec<ClassReportRow>,
}
