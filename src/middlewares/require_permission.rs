/*!
 * 基于权限的访问控制中间件
 *
 * 此中间件必须在 RequireSession 中间件之后使用，根据当前用户角色的权限表
 * 判断是否允许访问。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::{RequirePermission, RequireSession};
 * use crate::models::users::entities::Permission;
 *
 * web::scope("/api/v1/fees")
 *     .wrap(RequireSession)
 *     .service(
 *         web::scope("")
 *             .wrap(RequirePermission::new(Permission::ManageFees))
 *             .route("", web::post().to(create_fee)),
 *     );
 * ```
 *
 * 或者任一权限即可：
 *
 * ```rust,ignore
 * .wrap(RequirePermission::new_any(&[Permission::ViewFees, Permission::ManageFees]))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{Permission, User},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequirePermission {
    required: Vec<Permission>,
    require_all: bool, // true表示需要全部权限，false表示任一权限即可
}

impl RequirePermission {
    /// 需要单个权限
    pub fn new(permission: Permission) -> Self {
        Self {
            required: vec![permission],
            require_all: true,
        }
    }

    /// 需要任一权限
    pub fn new_any(permissions: &[Permission]) -> Self {
        Self {
            required: permissions.to_vec(),
            require_all: false,
        }
    }

    fn allows(required: &[Permission], require_all: bool, user: &User) -> bool {
        if require_all {
            required.iter().all(|p| user.role.has_permission(*p))
        } else {
            required.iter().any(|p| user.role.has_permission(*p))
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            required: self.required.clone(),
            require_all: self.require_all,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    required: Vec<Permission>,
    require_all: bool,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required = self.required.clone();
        let require_all = self.require_all;

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            match user {
                Some(user) if RequirePermission::allows(&required, require_all, &user) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(user) => {
                    info!(
                        "Access denied for user {} (role: {}). Required permissions: {:?}",
                        user.id, user.role, required
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Permission check failed: No user found in request. Make sure RequireSession middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use actix_web::{App, HttpResponse, test, web};

    fn user(role: UserRole) -> User {
        User {
            id: 1,
            username: "someone".to_string(),
            email: "someone@school.test".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_allows_single_and_any() {
        let teacher = user(UserRole::Teacher);
        assert!(RequirePermission::allows(
            &[Permission::RecordResults],
            true,
            &teacher
        ));
        assert!(!RequirePermission::allows(
            &[Permission::RecordResults, Permission::ManageFees],
            true,
            &teacher
        ));
        assert!(RequirePermission::allows(
            &[Permission::ManageFees, Permission::ViewStudents],
            false,
            &teacher
        ));
    }

    #[actix_web::test]
    async fn test_middleware_status_codes() {
        let app = test::init_service(
            App::new()
                .wrap_fn(|req, srv| {
                    // 模拟已登录用户
                    if let Some(role) = req.headers().get("X-Test-Role") {
                        let role: UserRole = role.to_str().unwrap().parse().unwrap();
                        req.extensions_mut().insert(user(role));
                    }
                    srv.call(req)
                })
                .service(
                    web::scope("/fees")
                        .wrap(RequirePermission::new(Permission::ManageFees))
                        .route("", web::post().to(HttpResponse::Ok)),
                ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/fees")
            .insert_header(("X-Test-Role", "admin"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::post()
            .uri("/fees")
            .insert_header(("X-Test-Role", "teacher"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::post().uri("/fees").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }
}
