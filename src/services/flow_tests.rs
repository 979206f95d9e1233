//! 服务层流程测试：注入内存存储，以指定用户身份调用处理函数

use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::http::{Method, StatusCode};
use actix_web::{App, HttpMessage, HttpRequest, test, web};

use crate::cache::ObjectCache;
use crate::cache::object_cache::moka::MokaCacheWrapper;
use crate::config::{AppConfig, DatabaseConfig};
use crate::models::ErrorCode;
use crate::models::auth::entities::NewSession;
use crate::models::classes::requests::{CreateClassRequest, UpdateClassRequest};
use crate::models::common::Gender;
use crate::models::exams::requests::{CreateExamRequest, RecordResultsRequest, ResultEntry};
use crate::models::students::requests::{CreateStudentRequest, UpdateStudentRequest};
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest};
use crate::routes::configure_auth_routes;
use crate::services::{ClassService, ExamService, StudentService, UserService};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::password::hash_password;
use crate::utils::session::{SessionClaims, SessionToken};

async fn storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .unwrap();
    Arc::new(storage)
}

async fn user(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@school.test"),
            password: "hash".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

fn request_as(user: &User) -> HttpRequest {
    let req = test::TestRequest::default().to_http_request();
    req.extensions_mut().insert(user.clone());
    req
}

fn new_student(admission_no: &str, class_id: Option<i64>) -> CreateStudentRequest {
    CreateStudentRequest {
        user_id: None,
        parent_id: None,
        class_id,
        admission_no: admission_no.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        gender: Gender::Female,
        birthday: None,
        guardian_name: None,
        guardian_phone: None,
        address: None,
    }
}

#[actix_web::test]
async fn test_enrolling_into_full_class_conflicts() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let class = storage
        .create_class(CreateClassRequest {
            name: "8C".to_string(),
            grade_level: 8,
            capacity: 1,
            supervisor_id: None,
        })
        .await
        .unwrap();

    let service = StudentService::with_storage(storage.clone());
    let req = request_as(&admin);

    let resp = service
        .create_student(new_student("S100", Some(class.id)), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = service
        .create_student(new_student("S101", Some(class.id)), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 学号重复
    let resp = service
        .create_student(new_student("S100", None), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_class_seats_are_enforced_on_updates() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;
    let create_class = |name: &str, capacity: i32| CreateClassRequest {
        name: name.to_string(),
        grade_level: 7,
        capacity,
        supervisor_id: None,
    };
    let full = storage.create_class(create_class("7A", 2)).await.unwrap();
    let other = storage.create_class(create_class("7B", 30)).await.unwrap();
    for no in ["S110", "S111"] {
        storage
            .create_student(new_student(no, Some(full.id)))
            .await
            .unwrap();
    }
    let mover = storage
        .create_student(new_student("S112", Some(other.id)))
        .await
        .unwrap();

    let req = request_as(&admin);

    // 容量不能低于在读人数
    let classes = ClassService::with_storage(storage.clone());
    let resp = classes
        .update_class(
            full.id,
            UpdateClassRequest {
                capacity: Some(1),
                ..Default::default()
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(storage.count_class_students(full.id).await.unwrap(), 2);

    // 转入已满的班级
    let students = StudentService::with_storage(storage.clone());
    let resp = students
        .update_student(
            mover.id,
            UpdateStudentRequest {
                class_id: Some(full.id),
                ..Default::default()
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let unchanged = storage.get_student_by_id(mover.id).await.unwrap().unwrap();
    assert_eq!(unchanged.student.class_id, Some(other.id));

    // 扩容后可以转入
    let resp = classes
        .update_class(
            full.id,
            UpdateClassRequest {
                capacity: Some(3),
                ..Default::default()
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = students
        .update_student(
            mover.id,
            UpdateStudentRequest {
                class_id: Some(full.id),
                ..Default::default()
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_parent_cannot_view_other_students() {
    let storage = storage().await;
    let parent = user(&storage, "parent", UserRole::Parent).await;
    let own = storage
        .create_student(CreateStudentRequest {
            parent_id: Some(parent.id),
            ..new_student("S200", None)
        })
        .await
        .unwrap();
    let other = storage.create_student(new_student("S201", None)).await.unwrap();

    let service = StudentService::with_storage(storage.clone());
    let req = request_as(&parent);

    let resp = service.get_student(own.id, &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = service.get_student(other.id, &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = service.get_student(9_999, &req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_record_results_rejects_bad_batches() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher", UserRole::Teacher).await;
    let class = storage
        .create_class(CreateClassRequest {
            name: "9A".to_string(),
            grade_level: 9,
            capacity: 30,
            supervisor_id: None,
        })
        .await
        .unwrap();
    let subject = storage
        .create_subject(CreateSubjectRequest {
            name: "Physics".to_string(),
            code: "PHY".to_string(),
            description: None,
        })
        .await
        .unwrap();
    storage
        .assign_subject(class.id, subject.id, None)
        .await
        .unwrap();
    let member = storage
        .create_student(new_student("S300", Some(class.id)))
        .await
        .unwrap();
    let outsider = storage.create_student(new_student("S301", None)).await.unwrap();

    let service = ExamService::with_storage(storage.clone());
    let req = request_as(&teacher);

    let resp = service
        .create_exam(
            CreateExamRequest {
                class_id: class.id,
                subject_id: subject.id,
                title: "Quiz 1".to_string(),
                term: "2025-T1".to_string(),
                exam_date: chrono::Utc::now(),
                max_score: 20.0,
                weight: None,
            },
            &req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let exam_id = storage
        .list_exams_with_pagination(Default::default())
        .await
        .unwrap()
        .items[0]
        .exam
        .id;

    let batch = |entries: Vec<(i64, f64)>| RecordResultsRequest {
        results: entries
            .into_iter()
            .map(|(student_id, score)| ResultEntry {
                student_id,
                score,
                remark: None,
            })
            .collect(),
    };

    let resp = service
        .record_results(exam_id, batch(vec![(member.id, 21.0)]), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = service
        .record_results(exam_id, batch(vec![(member.id, 15.0), (outsider.id, 10.0)]), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(storage.list_exam_results(exam_id).await.unwrap().is_empty());

    let resp = service
        .record_results(exam_id, batch(vec![(member.id, 15.0)]), &req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(storage.list_exam_results(exam_id).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_admin_cannot_delete_self() {
    let storage = storage().await;
    let admin = user(&storage, "admin", UserRole::Admin).await;

    let service = UserService::with_storage(storage.clone());
    let resp = service.delete_user(admin.id, &request_as(&admin)).await.unwrap();
    assert!(resp.status().is_client_error());
    assert!(storage.get_user_by_id(admin.id).await.unwrap().is_some());
}

const PASSWORD: &str = "Str0ng-Passw0rd";
const CLIENT_IP: &str = "10.20.30.40";

fn memory_cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::with_capacity(1_000, 300))
}

async fn account(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@school.test"),
            password: hash_password(PASSWORD).unwrap(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

fn login_request(username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("X-Forwarded-For", CLIENT_IP))
        .set_json(serde_json::json!({ "username": username, "password": password }))
}

fn session_request(cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .cookie(cookie.clone())
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    let name = &AppConfig::get().session.cookie_name;
    resp.response()
        .cookies()
        .find(|c| c.name() == name.as_str())
        .map(|c| c.into_owned())
}

#[actix_web::test]
async fn test_login_session_and_logout() {
    let storage = storage().await;
    let cache = memory_cache();
    let admin = account(&storage, "registrar", UserRole::Admin).await;
    let teacher = account(&storage, "mwright", UserRole::Teacher).await;
    let retired = account(&storage, "retired", UserRole::Teacher).await;
    storage
        .update_user(
            retired.id,
            UpdateUserRequest {
                status: Some(UserStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(configure_auth_routes),
    )
    .await;

    // 密码错误和账号不存在返回同样的结果
    let wrong = test::call_service(
        &app,
        login_request("mwright", "not-the-password").to_request(),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong: serde_json::Value = test::read_body_json(wrong).await;
    let unknown = test::call_service(&app, login_request("nobody", PASSWORD).to_request()).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown: serde_json::Value = test::read_body_json(unknown).await;
    assert_eq!(wrong["code"], ErrorCode::AuthFailed as i32);
    assert_eq!(wrong["code"], unknown["code"]);
    assert_eq!(wrong["message"], unknown["message"]);

    let resp = test::call_service(&app, login_request("retired", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        login_request("mwright@school.test", PASSWORD).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).unwrap();
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    let lifetime = AppConfig::get().session.ttl_hours * 3600;
    let max_age = cookie.max_age().unwrap().whole_seconds();
    assert!((lifetime - 5..=lifetime).contains(&max_age));

    let resp = test::call_service(&app, session_request(&cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 预检请求不需要会话
    let preflight = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/session")
        .to_request();
    let resp = test::call_service(&app, preflight).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let anonymous = test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .to_request();
    let resp = test::call_service(&app, anonymous).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 资料修改后会话接口返回新数据
    let users = UserService::with_storage(storage.clone());
    let admin_req = test::TestRequest::default()
        .app_data(web::Data::new(cache.clone()))
        .to_http_request();
    admin_req.extensions_mut().insert(admin.clone());
    let resp = users
        .update_user(
            teacher.id,
            UpdateUserRequest {
                display_name: Some("Ms. Wright".to_string()),
                ..Default::default()
            },
            &admin_req,
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, session_request(&cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["display_name"], "Ms. Wright");

    let logout = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, logout).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = session_cookie(&resp).unwrap();
    assert_eq!(cleared.max_age().map(|d| d.whole_seconds()), Some(0));

    // 登出后旧令牌失效
    let resp = test::call_service(&app, session_request(&cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(storage.list_user_sessions(teacher.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_expired_session_row_is_discarded() {
    let storage = storage().await;
    let cache = memory_cache();
    let teacher = user(&storage, "lkim", UserRole::Teacher).await;
    let config = AppConfig::get();

    // 令牌仍在有效期内，但会话记录已过期
    let sid = uuid::Uuid::new_v4().to_string();
    storage
        .create_session(NewSession {
            id: sid.clone(),
            user_id: teacher.id,
            remember_me: false,
            ip_address: None,
            user_agent: None,
            expires_at: chrono::Utc::now() - chrono::Duration::minutes(1),
        })
        .await
        .unwrap();
    let claims = SessionClaims::new(
        &sid,
        teacher.id,
        "teacher",
        chrono::Utc::now() + chrono::Duration::hours(1),
    );
    let token = SessionToken::issue(&config.session.secret, &claims).unwrap();
    let cookie = Cookie::new(config.session.cookie_name.clone(), token);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(configure_auth_routes),
    )
    .await;

    let resp = test::call_service(&app, session_request(&cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let cleared = session_cookie(&resp).unwrap();
    assert_eq!(cleared.max_age().map(|d| d.whole_seconds()), Some(0));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::SessionExpired as i32);
    assert!(storage.get_session(&sid).await.unwrap().is_none());
}
