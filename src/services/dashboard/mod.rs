use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::dashboard::responses::{DashboardSummary, EntityCounts};
use crate::services::internal_error;

// 统计最近考试的时间窗口
const RECENT_EXAM_DAYS: i64 = 30;

define_service!(DashboardService);

impl DashboardService {
    pub async fn summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        match self.collect(request).await {
            Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "ok"))),
            Err(e) => Ok(internal_error("Failed to build dashboard", e)),
        }
    }

    async fn collect(&self, request: &HttpRequest) -> Result<DashboardSummary> {
        let storage = self.get_storage(request);

        let counts = EntityCounts {
            users: storage.count_users().await? as i64,
            students: storage.count_students().await? as i64,
            teachers: storage.count_teachers().await? as i64,
            classes: storage.count_classes().await? as i64,
            subjects: storage.count_subjects().await? as i64,
        };
        let since = chrono::Utc::now() - chrono::Duration::days(RECENT_EXAM_DAYS);

        Ok(DashboardSummary {
            counts,
            students_by_gender: storage.count_students_by_gender().await?,
            fees: storage.fee_summary(None).await?,
            recent_exams: storage.count_exams(Some(since)).await? as i64,
        })
    }
}
