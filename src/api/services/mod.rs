pub mod assignments;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod queues;
pub mod types;
pub mod workers;

use actix_web::web;

use crate::api::constants::API_PREFIX;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use types::ApiResponse;

/// 挂载全部 `/api` 路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(health_routes())
            .service(workers::workers_routes())
            .service(assignments::schedule_routes())
            .service(assignments::assignments_routes())
            .service(queues::queues_routes())
            .service(queues::suggestions_routes()),
    );
}
