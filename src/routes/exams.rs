use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission};
use crate::models::exams::requests::{
    CreateExamRequest, ExamQueryParams, RecordResultsRequest, UpdateExamRequest,
};
use crate::models::users::entities::Permission;
use crate::services::ExamService;
use crate::utils::SafeIDI64;

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamQueryParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(query.into_inner(), &req).await
}

pub async fn create_exam(
    req: HttpRequest,
    body: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(body.into_inner(), &req).await
}

pub async fn get_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(exam_id.0, &req).await
}

pub async fn update_exam(
    req: HttpRequest,
    exam_id: SafeIDI64,
    body: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(exam_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(exam_id.0, &req).await
}

pub async fn list_exam_results(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_results(exam_id.0, &req).await
}

pub async fn record_exam_results(
    req: HttpRequest,
    exam_id: SafeIDI64,
    body: web::Json<RecordResultsRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .record_results(exam_id.0, body.into_inner(), &req)
        .await
}

pub async fn export_exam_results(
    req: HttpRequest,
    exam_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.export_results(exam_id.0, &req).await
}

pub async fn exam_stats(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.exam_stats(exam_id.0, &req).await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_exams)
                            .wrap(RequirePermission::new(Permission::ViewExams)),
                    )
                    .route(
                        web::post()
                            .to(create_exam)
                            .wrap(RequirePermission::new(Permission::ManageExams)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_exam)
                            .wrap(RequirePermission::new(Permission::ViewExams)),
                    )
                    .route(
                        web::put()
                            .to(update_exam)
                            .wrap(RequirePermission::new(Permission::ManageExams)),
                    )
                    .route(
                        web::delete()
                            .to(delete_exam)
                            .wrap(RequirePermission::new(Permission::ManageExams)),
                    ),
            )
            .service(
                web::resource("/{id}/results")
                    .route(
                        web::get()
                            .to(list_exam_results)
                            .wrap(RequirePermission::new(Permission::ViewResults)),
                    )
                    .route(
                        web::post()
                            .to(record_exam_results)
                            .wrap(RequirePermission::new(Permission::RecordResults)),
                    ),
            )
            .service(
                web::resource("/{id}/results/export").route(
                    web::get()
                        .to(export_exam_results)
                        .wrap(RateLimit::export())
                        .wrap(RequirePermission::new(Permission::ExportData)),
                ),
            )
            .service(
                web::resource("/{id}/stats").route(
                    web::get()
                        .to(exam_stats)
                        .wrap(RequirePermission::new(Permission::ViewExams)),
                ),
            ),
    );
}
