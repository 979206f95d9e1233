use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::users::entities::Permission;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn dashboard_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.summary(&req).await
}

pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireSession)
            .route(
                "",
                web::get()
                    .to(dashboard_summary)
                    .wrap(RequirePermission::new(Permission::ViewDashboard)),
            ),
    );
}
