use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::report_cards::requests::ReportCardParams;
use crate::models::users::entities::Permission;
use crate::services::ReportCardService;
use crate::utils::SafeIDI64;

static REPORT_CARD_SERVICE: Lazy<ReportCardService> = Lazy::new(ReportCardService::new_lazy);

pub async fn student_report(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<ReportCardParams>,
) -> ActixResult<HttpResponse> {
    REPORT_CARD_SERVICE
        .student_report(student_id.0, query.into_inner(), &req)
        .await
}

pub async fn class_report(
    req: HttpRequest,
    class_id: SafeIDI64,
    query: web::Query<ReportCardParams>,
) -> ActixResult<HttpResponse> {
    REPORT_CARD_SERVICE
        .class_report(class_id.0, query.into_inner(), &req)
        .await
}

pub fn configure_report_cards_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/report-cards")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("/students/{id}").route(
                    web::get()
                        .to(student_report)
                        .wrap(RequirePermission::new(Permission::ViewReportCards)),
                ),
            )
            // 班级汇总包含全班成绩，仅教职工可见
            .service(
                web::resource("/classes/{id}").route(
                    web::get()
                        .to(class_report)
                        .wrap(RequirePermission::new(Permission::ViewStudents)),
                ),
            ),
    );
}
