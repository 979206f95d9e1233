//! 预导入模块，方便使用

pub use super::class_subjects::{
    ActiveModel as ClassSubjectActiveModel, Entity as ClassSubjects, Model as ClassSubjectModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::exam_results::{
    ActiveModel as ExamResultActiveModel, Entity as ExamResults, Model as ExamResultModel,
};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::fee_payments::{
    ActiveModel as FeePaymentActiveModel, Entity as FeePayments, Model as FeePaymentModel,
};
pub use super::fees::{ActiveModel as FeeActiveModel, Entity as Fees, Model as FeeModel};
pub use super::sessions::{
    ActiveModel as SessionActiveModel, Entity as Sessions, Model as SessionModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
