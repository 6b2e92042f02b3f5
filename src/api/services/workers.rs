//! Worker CRUD 接口

use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::WorkerService;
use crate::storage::{NewWorker, WorkerPatch};

use super::helpers::{api_result, created_response, error_from_roster};
use super::types::{CreateWorkerRequest, UpdateWorkerRequest, WorkerResponse};

/// GET /workers
pub async fn list_workers(service: web::Data<Arc<WorkerService>>) -> impl Responder {
    trace!("API: list workers");
    let result = service
        .list_workers()
        .await
        .map(|workers| workers.into_iter().map(WorkerResponse::from).collect::<Vec<_>>());
    api_result(result)
}

/// GET /workers/{id}
pub async fn get_worker(
    path: web::Path<i32>,
    service: web::Data<Arc<WorkerService>>,
) -> impl Responder {
    let id = path.into_inner();
    api_result(service.get_worker(id).await.map(WorkerResponse::from))
}

/// POST /workers
pub async fn create_worker(
    body: web::Json<CreateWorkerRequest>,
    service: web::Data<Arc<WorkerService>>,
) -> impl Responder {
    let req = body.into_inner();
    let new = NewWorker {
        name: req.name,
        title: req.title,
        department: req.department,
        hard_chores_counter: req.hard_chores_counter.unwrap_or(0),
        outer_partner_counter: req.outer_partner_counter.unwrap_or(0),
    };

    match service.create_worker(new).await {
        Ok(worker) => {
            info!("API: worker '{}' created", worker.name);
            created_response(
                format!("Worker \"{}\" created successfully", worker.name),
                WorkerResponse::from(worker),
            )
        }
        Err(e) => error_from_roster(&e),
    }
}

/// PUT /workers/{id}
pub async fn update_worker(
    path: web::Path<i32>,
    body: web::Json<UpdateWorkerRequest>,
    service: web::Data<Arc<WorkerService>>,
) -> impl Responder {
    let req = body.into_inner();
    let patch = WorkerPatch {
        name: req.name,
        title: req.title,
        department: req.department,
        hard_chores_counter: req.hard_chores_counter,
        outer_partner_counter: req.outer_partner_counter,
    };
    api_result(
        service
            .update_worker(path.into_inner(), patch)
            .await
            .map(WorkerResponse::from),
    )
}

/// DELETE /workers/{id}
pub async fn delete_worker(
    path: web::Path<i32>,
    service: web::Data<Arc<WorkerService>>,
) -> impl Responder {
    match service.delete_worker(path.into_inner()).await {
        Ok(worker) => {
            info!("API: worker '{}' deleted", worker.name);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_from_roster(&e),
    }
}

/// Worker 路由 `/workers`
pub fn workers_routes() -> actix_web::Scope {
    web::scope("/workers")
        .route("", web::get().to(list_workers))
        .route("", web::post().to(create_worker))
        .route("/{id}", web::get().to(get_worker))
        .route("/{id}", web::put().to(update_worker))
        .route("/{id}", web::delete().to(delete_worker))
}
