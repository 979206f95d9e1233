use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission};
use crate::models::students::requests::{
    CreateStudentRequest, StudentExportParams, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::users::entities::Permission;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// 学生和家长没有 ViewStudents，凭成绩单权限读取自己（孩子）的学籍，由服务层按范围过滤
const SCOPED_READ: &[Permission] = &[Permission::ViewStudents, Permission::ViewReportCards];

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentQueryParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(student_id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(student_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(student_id.0, &req).await
}

pub async fn export_students(
    req: HttpRequest,
    query: web::Query<StudentExportParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.export_students(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(RequirePermission::new_any(SCOPED_READ)),
                    )
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(RequirePermission::new(Permission::ManageStudents)),
                    ),
            )
            // 静态路径放在 /{id} 之前
            .service(
                web::resource("/export").route(
                    web::get()
                        .to(export_students)
                        .wrap(RateLimit::export())
                        .wrap(RequirePermission::new(Permission::ExportData)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_student)
                            .wrap(RequirePermission::new_any(SCOPED_READ)),
                    )
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(RequirePermission::new(Permission::ManageStudents)),
                    )
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(RequirePermission::new(Permission::ManageStudents)),
                    ),
            ),
    );
}
