//! Worker queries and counter updates
//!
//! Free functions take any `ConnectionTrait`, so they run equally on the
//! pooled connection or inside a service transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Select, sea_query::Expr,
};
use tracing::debug;

use super::converters::{model_to_worker, new_worker_active_model, normalize_department};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, RosterError};
use crate::storage::{FairnessCounter, NewWorker, Worker, WorkerPatch};

use migration::entities::worker;

fn counter_column(counter: FairnessCounter) -> worker::Column {
    match counter {
        FairnessCounter::HardChores => worker::Column::HardChoresCounter,
        FairnessCounter::OuterPartner => worker::Column::OuterPartnerCounter,
    }
}

/// 默认排序：按姓名，同名按 id
fn ordered() -> Select<worker::Entity> {
    worker::Entity::find()
        .order_by_asc(worker::Column::Name)
        .order_by_asc(worker::Column::Id)
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Worker>> {
    worker::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(model_to_worker)
        .transpose()
}

/// 查询 Worker，不存在时返回 `WorkerNotFound`
pub async fn get<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Worker> {
    find(conn, id)
        .await?
        .ok_or_else(|| RosterError::worker_not_found(id))
}

pub async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<Worker>> {
    ordered()
        .all(conn)
        .await?
        .into_iter()
        .map(model_to_worker)
        .collect()
}

pub async fn list_by_ids<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> Result<Vec<Worker>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    ordered()
        .filter(worker::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(model_to_worker)
        .collect()
}

pub async fn insert<C: ConnectionTrait>(conn: &C, new: &NewWorker) -> Result<Worker> {
    let model = new_worker_active_model(new).insert(conn).await?;
    debug!("Worker inserted: {} ({})", model.name, model.id);
    model_to_worker(model)
}

/// 仅更新 patch 中给出的字段
pub async fn update<C: ConnectionTrait>(conn: &C, id: i32, patch: &WorkerPatch) -> Result<Worker> {
    use sea_orm::ActiveValue::Set;

    let model = worker::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| RosterError::worker_not_found(id))?;

    let mut active = model.into_active_model();
    if let Some(name) = &patch.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(title) = patch.title {
        active.title = Set(title.as_str().to_string());
    }
    if let Some(department) = &patch.department {
        active.department = Set(normalize_department(Some(department)));
    }
    if let Some(value) = patch.hard_chores_counter {
        active.hard_chores_counter = Set(value);
    }
    if let Some(value) = patch.outer_partner_counter {
        active.outer_partner_counter = Set(value);
    }
    active.updated_at = Set(Utc::now());

    model_to_worker(active.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<()> {
    let result = worker::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(RosterError::worker_not_found(id));
    }
    Ok(())
}

pub async fn count<C: ConnectionTrait>(conn: &C) -> Result<u64> {
    Ok(worker::Entity::find().count(conn).await?)
}

/// `counter = counter + 1`
pub async fn increment_counter<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
    counter: FairnessCounter,
) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let col = counter_column(counter);
    let result = worker::Entity::update_many()
        .col_expr(col, Expr::col(col).add(1))
        .col_expr(worker::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(worker::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// `counter = CASE WHEN counter > 0 THEN counter - 1 ELSE 0 END`
pub async fn decrement_counter<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
    counter: FairnessCounter,
) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let col = counter_column(counter);
    let result = worker::Entity::update_many()
        .col_expr(
            col,
            Expr::case(Expr::col(col).gt(0), Expr::col(col).sub(1))
                .finally(0)
                .into(),
        )
        .col_expr(worker::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(worker::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

impl SeaOrmStorage {
    pub async fn get_worker(&self, id: i32) -> Result<Option<Worker>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_worker({})", id), self.retry_config, || async {
            worker::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| RosterError::database_operation(format!("Failed to load worker: {}", e)))?;

        model.map(model_to_worker).transpose()
    }

    pub async fn list_workers(&self) -> Result<Vec<Worker>> {
        let db = &self.db;

        let models = retry::with_retry("list_workers", self.retry_config, || async {
            ordered().all(db).await
        })
        .await
        .map_err(|e| RosterError::database_operation(format!("Failed to list workers: {}", e)))?;

        models.into_iter().map(model_to_worker).collect()
    }

    pub async fn count_workers(&self) -> Result<u64> {
        let db = &self.db;

        retry::with_retry("count_workers", self.retry_config, || async {
            worker::Entity::find().count(db).await
        })
        .await
        .map_err(|e| RosterError::database_operation(format!("Failed to count workers: {}", e)))
    }
}
