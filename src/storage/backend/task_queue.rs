//! Round-robin task queues
//!
//! Every mutation rewrites the positions of the affected task type so they
//! stay exactly `0..n-1`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};
use strum::IntoEnumIterator;
use tracing::debug;

use super::converters::model_to_queue_entry;
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, RosterError};
use crate::storage::{QueueEntry, TaskType};

use migration::entities::task_queue;

fn ordered(task_type: TaskType) -> sea_orm::Select<task_queue::Entity> {
    task_queue::Entity::find()
        .filter(task_queue::Column::TaskType.eq(task_type.as_str()))
        .order_by_asc(task_queue::Column::Position)
        .order_by_asc(task_queue::Column::Id)
}

pub async fn load_queue<C: ConnectionTrait>(conn: &C, task_type: TaskType) -> Result<Vec<QueueEntry>> {
    ordered(task_type)
        .all(conn)
        .await?
        .into_iter()
        .map(model_to_queue_entry)
        .collect()
}

/// 队首 Worker
pub async fn next_worker_id<C: ConnectionTrait>(conn: &C, task_type: TaskType) -> Result<Option<i32>> {
    Ok(ordered(task_type)
        .one(conn)
        .await?
        .map(|model| model.worker_id))
}

/// 按给定顺序重写位置，缺失的条目补建
async fn write_order<C: ConnectionTrait>(
    conn: &C,
    task_type: TaskType,
    current: &[QueueEntry],
    order: &[i32],
) -> Result<()> {
    use sea_orm::ActiveValue::*;

    for (index, worker_id) in order.iter().enumerate() {
        let position = index as i32;
        match current.iter().find(|e| e.worker_id == *worker_id) {
            Some(entry) if entry.position == position => {}
            Some(entry) => {
                task_queue::Entity::update_many()
                    .col_expr(task_queue::Column::Position, Expr::value(position))
                    .filter(task_queue::Column::Id.eq(entry.id))
                    .exec(conn)
                    .await?;
            }
            None => {
                task_queue::ActiveModel {
                    id: NotSet,
                    worker_id: Set(*worker_id),
                    task_type: Set(task_type.as_str().to_string()),
                    position: Set(position),
                }
                .insert(conn)
                .await?;
            }
        }
    }
    Ok(())
}

/// 将 Worker 移到队尾，不在队列中则追加
pub async fn move_to_end<C: ConnectionTrait>(
    conn: &C,
    worker_id: i32,
    task_type: TaskType,
) -> Result<()> {
    let current = load_queue(conn, task_type).await?;
    let mut order: Vec<i32> = current
        .iter()
        .map(|e| e.worker_id)
        .filter(|id| *id != worker_id)
        .collect();
    order.push(worker_id);

    write_order(conn, task_type, &current, &order).await?;
    debug!("Worker {} moved to end of {} queue", worker_id, task_type);
    Ok(())
}

/// 将 Worker 移到队首，不在队列中则插入队首
pub async fn move_to_front<C: ConnectionTrait>(
    conn: &C,
    worker_id: i32,
    task_type: TaskType,
) -> Result<()> {
    let current = load_queue(conn, task_type).await?;
    let order: Vec<i32> = std::iter::once(worker_id)
        .chain(
            current
                .iter()
                .map(|e| e.worker_id)
                .filter(|id| *id != worker_id),
        )
        .collect();

    write_order(conn, task_type, &current, &order).await?;
    debug!("Worker {} moved to front of {} queue", worker_id, task_type);
    Ok(())
}

/// 为 Worker 在每个缺少条目的任务队列末尾追加条目，返回新建数量
pub async fn initialize_for_worker<C: ConnectionTrait>(conn: &C, worker_id: i32) -> Result<usize> {
    use sea_orm::ActiveValue::*;

    let mut created = 0;
    for task_type in TaskType::iter() {
        let current = load_queue(conn, task_type).await?;
        if current.iter().any(|e| e.worker_id == worker_id) {
            continue;
        }
        let position = current.iter().map(|e| e.position + 1).max().unwrap_or(0);
        task_queue::ActiveModel {
            id: NotSet,
            worker_id: Set(worker_id),
            task_type: Set(task_type.as_str().to_string()),
            position: Set(position),
        }
        .insert(conn)
        .await?;
        created += 1;
    }
    Ok(created)
}

/// 重新编号为 0..n-1，保持相对顺序
pub async fn compact<C: ConnectionTrait>(conn: &C, task_type: TaskType) -> Result<()> {
    let current = load_queue(conn, task_type).await?;
    let order: Vec<i32> = current.iter().map(|e| e.worker_id).collect();
    write_order(conn, task_type, &current, &order).await
}

/// 删除 Worker 的全部队列条目，并重新编号所有队列
pub async fn delete_for_worker<C: ConnectionTrait>(conn: &C, worker_id: i32) -> Result<u64> {
    let result = task_queue::Entity::delete_many()
        .filter(task_queue::Column::WorkerId.eq(worker_id))
        .exec(conn)
        .await?;
    for task_type in TaskType::iter() {
        compact(conn, task_type).await?;
    }
    Ok(result.rows_affected)
}

impl SeaOrmStorage {
    pub async fn queue(&self, task_type: TaskType) -> Result<Vec<QueueEntry>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("queue({})", task_type),
            self.retry_config,
            || async { ordered(task_type).all(db).await },
        )
        .await
        .map_err(|e| RosterError::database_operation(format!("Failed to load queue: {}", e)))?;

        models.into_iter().map(model_to_queue_entry).collect()
    }
}
