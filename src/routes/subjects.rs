use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectQueryParams, UpdateSubjectRequest,
};
use crate::models::users::entities::Permission;
use crate::services::SubjectService;
use crate::utils::SafeIDI64;

static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectQueryParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.create_subject(body.into_inner(), &req).await
}

pub async fn get_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(subject_id.0, &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    body: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(subject_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(subject_id.0, &req).await
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_subjects)
                            .wrap(RequirePermission::new(Permission::ViewSubjects)),
                    )
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(RequirePermission::new(Permission::ManageSubjects)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_subject)
                            .wrap(RequirePermission::new(Permission::ViewSubjects)),
                    )
                    .route(
                        web::put()
                            .to(update_subject)
                            .wrap(RequirePermission::new(Permission::ManageSubjects)),
                    )
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(RequirePermission::new(Permission::ManageSubjects)),
                    ),
            ),
    );
}
