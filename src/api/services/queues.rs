//! 任务队列与推荐接口

use actix_web::{Responder, web};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::info;

use crate::errors::RosterError;
use crate::services::{QueueService, SuggestionQuery, SuggestionService};
use crate::storage::TaskType;

use super::helpers::{
    api_result, created_response, date_or_today, error_from_roster, parse_date, parse_task_type,
    parse_time_slot,
};
use super::types::{
    AcceptSuggestionRequest, AssignOutcomeResponse, InitializeQueuesResponse, QueueResponse,
    SuggestionParams, WorkerResponse,
};

/// GET /queues
pub async fn list_queues(service: web::Data<Arc<QueueService>>) -> impl Responder {
    let result = service.all_queues().await.map(|queues| {
        queues
            .into_iter()
            .map(|(task_type, queue)| QueueResponse::new(task_type, queue))
            .collect::<Vec<_>>()
    });
    api_result(result)
}

/// GET /queues/{task_type}
pub async fn get_queue(
    path: web::Path<String>,
    service: web::Data<Arc<QueueService>>,
) -> impl Responder {
    let task_type = match parse_task_type(&path) {
        Ok(t) => t,
        Err(e) => return error_from_roster(&e),
    };
    api_result(
        service
            .queue_for_task(task_type)
            .await
            .map(|queue| QueueResponse::new(task_type, queue)),
    )
}

/// POST /queues/initialize
pub async fn initialize_queues(service: web::Data<Arc<QueueService>>) -> impl Responder {
    let result = service.initialize_all().await;
    if let Ok(report) = &result {
        info!(
            "API: queues initialized for {} workers, {} entries created ({} task types)",
            report.workers,
            report.created,
            TaskType::iter().count()
        );
    }
    api_result(result.map(InitializeQueuesResponse::from))
}

fn suggestion_query(task_type: &str, params: &SuggestionParams) -> Result<SuggestionQuery, RosterError> {
    Ok(SuggestionQuery {
        task_type: parse_task_type(task_type)?,
        date: date_or_today(params.date.as_deref()),
        time_slot: parse_time_slot(params.time_slot.as_deref())?,
        commanders_only: params.commanders_only,
    })
}

/// GET /suggestions/{task_type}?date&time_slot&commanders_only
///
/// 无可用人选时 data 为 null。
pub async fn get_suggestion(
    path: web::Path<String>,
    query: web::Query<SuggestionParams>,
    service: web::Data<Arc<SuggestionService>>,
) -> impl Responder {
    let query = match suggestion_query(&path, &query) {
        Ok(q) => q,
        Err(e) => return error_from_roster(&e),
    };
    api_result(
        service
            .next_suggestion(&query)
            .await
            .map(|worker| worker.map(WorkerResponse::from)),
    )
}

/// POST /suggestions/{task_type}/accept
pub async fn accept_suggestion(
    path: web::Path<String>,
    body: web::Json<AcceptSuggestionRequest>,
    service: web::Data<Arc<SuggestionService>>,
) -> impl Responder {
    let req = body.into_inner();
    let query = parse_task_type(&path).and_then(|task_type| {
        Ok(SuggestionQuery {
            task_type,
            date: parse_date(&req.date)?,
            time_slot: parse_time_slot(req.time_slot.as_deref())?,
            commanders_only: false,
        })
    });
    let query = match query {
        Ok(q) => q,
        Err(e) => return error_from_roster(&e),
    };

    match service.accept_suggestion(&query, req.worker_id).await {
        Ok(outcome) => {
            info!("API: suggestion accepted: {}", outcome.message);
            let message = outcome.message.clone();
            created_response(message, AssignOutcomeResponse::from(outcome))
        }
        Err(e) => error_from_roster(&e),
    }
}

/// 队列路由 `/queues`
pub fn queues_routes() -> actix_web::Scope {
    web::scope("/queues")
        .route("", web::get().to(list_queues))
        // 必须在 /{task_type} 之前
        .route("/initialize", web::post().to(initialize_queues))
        .route("/{task_type}", web::get().to(get_queue))
}

/// 推荐路由 `/suggestions`
pub fn suggestions_routes() -> actix_web::Scope {
    web::scope("/suggestions")
        .route("/{task_type}", web::get().to(get_suggestion))
        .route("/{task_type}/accept", web::post().to(accept_suggestion))
}
