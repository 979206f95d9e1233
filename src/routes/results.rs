use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::results::requests::ResultQueryParams;
use crate::models::users::entities::Permission;
use crate::services::ResultService;
use crate::utils::SafeIDI64;

static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn list_results(
    req: HttpRequest,
    query: web::Query<ResultQueryParams>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.list_results(query.into_inner(), &req).await
}

pub async fn delete_result(req: HttpRequest, result_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.delete_result(result_id.0, &req).await
}

pub fn configure_results_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireSession)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_results)
                        .wrap(RequirePermission::new(Permission::ViewResults)),
                ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_result)
                        .wrap(RequirePermission::new(Permission::RecordResults)),
                ),
            ),
    );
}
