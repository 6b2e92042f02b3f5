use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::storage::SeaOrmStorage;

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};
use super::types::HealthResponse;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

/// Health Service
///
/// 直接查询 storage 的 worker 数量，不经过业务 service。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = storage.get_backend_config();
        let workers =
            match tokio::time::timeout(Duration::from_secs(5), storage.count_workers()).await {
                Ok(Ok(count)) => count,
                Ok(Err(e)) => {
                    error!("Storage health check failed: {}", e);
                    return error_response(
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorCode::ServiceUnavailable,
                        &format!("database error: {}", e),
                    );
                }
                Err(_) => {
                    error!("Storage health check timeout");
                    return error_response(
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorCode::ServiceUnavailable,
                        "database timeout",
                    );
                }
            };

        let uptime = (chrono::Utc::now() - app_start_time.start_datetime)
            .num_seconds()
            .max(0) as u64;

        info!(
            "Health check completed in {:?}, {} workers, uptime {}s",
            start_time.elapsed(),
            workers,
            uptime
        );

        success_response(HealthResponse {
            status: "ok".to_string(),
            database: backend.storage_type,
            workers,
            uptime,
        })
    }
}

/// Health 路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
