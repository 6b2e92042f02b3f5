use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::{AssignmentService, QueueService, SuggestionService, WorkerService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器运行所需的共享组件
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub worker_service: Arc<WorkerService>,
    pub assignment_service: Arc<AssignmentService>,
    pub queue_service: Arc<QueueService>,
    pub suggestion_service: Arc<SuggestionService>,
}

impl StartupContext {
    /// 基于已有存储构建 service（测试中直接使用）
    pub fn from_storage(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            worker_service: Arc::new(WorkerService::new(storage.clone())),
            assignment_service: Arc::new(AssignmentService::new(storage.clone())),
            queue_service: Arc::new(QueueService::new(storage.clone())),
            suggestion_service: Arc::new(SuggestionService::new(storage.clone())),
            storage,
        }
    }
}

/// 准备服务器启动的上下文：连接数据库、执行迁移、构建 service
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let workers = storage
        .count_workers()
        .await
        .context("Failed to query workers")?;
    info!("{} workers registered", workers);

    let context = StartupContext::from_storage(storage);
    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}
