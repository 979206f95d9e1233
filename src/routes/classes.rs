use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::classes::requests::{
    AssignSubjectRequest, ClassQueryParams, CreateClassRequest, UpdateClassRequest,
};
use crate::models::users::entities::Permission;
use crate::services::ClassService;
use crate::utils::{SafeIDI64, SafeSubjectIdI64};

// 懒加载的全局 ClassService 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(query.into_inner(), &req).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.create_class(class_data.into_inner(), &req).await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(class_id.0, &req).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeIDI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(class_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(class_id.0, &req).await
}

pub async fn list_class_students(
    req: HttpRequest,
    class_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_class_students(class_id.0, &req).await
}

pub async fn assign_subject(
    req: HttpRequest,
    class_id: SafeIDI64,
    body: web::Json<AssignSubjectRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .assign_subject(class_id.0, body.into_inner(), &req)
        .await
}

pub async fn unassign_subject(
    req: HttpRequest,
    class_id: SafeIDI64,
    subject_id: SafeSubjectIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .unassign_subject(class_id.0, subject_id.0, &req)
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_classes)
                            .wrap(RequirePermission::new(Permission::ViewClasses)),
                    )
                    .route(
                        web::post()
                            .to(create_class)
                            .wrap(RequirePermission::new(Permission::ManageClasses)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_class)
                            .wrap(RequirePermission::new(Permission::ViewClasses)),
                    )
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(RequirePermission::new(Permission::ManageClasses)),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(RequirePermission::new(Permission::ManageClasses)),
                    ),
            )
            .service(
                web::resource("/{id}/students").route(
                    web::get()
                        .to(list_class_students)
                        .wrap(RequirePermission::new(Permission::ViewStudents)),
                ),
            )
            .service(
                web::resource("/{id}/subjects").route(
                    web::post()
                        .to(assign_subject)
                        .wrap(RequirePermission::new(Permission::ManageClasses)),
                ),
            )
            .service(
                web::resource("/{id}/subjects/{subject_id}").route(
                    web::delete()
                        .to(unassign_subject)
                        .wrap(RequirePermission::new(Permission::ManageClasses)),
                ),
            ),
    );
}
