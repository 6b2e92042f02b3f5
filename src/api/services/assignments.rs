//! 日程与排班接口

use actix_web::{Responder, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::errors::RosterError;
use crate::services::{AssignRequest, AssignmentService};

use super::helpers::{
    api_result, created_response, date_or_today, error_from_roster, parse_date, parse_task_type,
    parse_time_slot,
};
use super::types::{
    AssignOutcomeResponse, CreateAssignmentRequest, DayScheduleResponse, RemoveOutcomeResponse,
    ScheduleQuery,
};

/// GET /schedule?date=YYYY-MM-DD
///
/// 日期缺失或无法解析时使用今天。
pub async fn get_schedule(
    query: web::Query<ScheduleQuery>,
    service: web::Data<Arc<AssignmentService>>,
) -> impl Responder {
    let date = date_or_today(query.date.as_deref());
    trace!("API: schedule for {}", date);
    api_result(
        service
            .day_schedule(date)
            .await
            .map(DayScheduleResponse::from),
    )
}

fn assign_request(req: CreateAssignmentRequest) -> Result<AssignRequest, RosterError> {
    Ok(AssignRequest {
        date: parse_date(&req.date)?,
        task_type: parse_task_type(&req.task_type)?,
        time_slot: parse_time_slot(req.time_slot.as_deref())?,
        worker_id: req.worker_id,
        is_commander: req.is_commander,
    })
}

/// POST /assignments
pub async fn create_assignment(
    body: web::Json<CreateAssignmentRequest>,
    service: web::Data<Arc<AssignmentService>>,
) -> impl Responder {
    let req = match assign_request(body.into_inner()) {
        Ok(req) => req,
        Err(e) => return error_from_roster(&e),
    };

    match service.assign(req).await {
        Ok(outcome) => {
            info!("API: {}", outcome.message);
            let message = outcome.message.clone();
            created_response(message, AssignOutcomeResponse::from(outcome))
        }
        Err(e) => error_from_roster(&e),
    }
}

/// DELETE /assignments/{id}
pub async fn delete_assignment(
    path: web::Path<i32>,
    service: web::Data<Arc<AssignmentService>>,
) -> impl Responder {
    api_result(
        service
            .remove(path.into_inner())
            .await
            .map(RemoveOutcomeResponse::from),
    )
}

/// 日程路由 `/schedule`
pub fn schedule_routes() -> actix_web::Scope {
    web::scope("/schedule").route("", web::get().to(get_schedule))
}

/// 排班路由 `/assignments`
pub fn assignments_routes() -> actix_web::Scope {
    web::scope("/assignments")
        .route("", web::post().to(create_assignment))
        .route("/{id}", web::delete().to(delete_assignment))
}
