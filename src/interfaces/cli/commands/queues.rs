//! Queue commands

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::{QueueService, QueueSlot};
use crate::storage::{SeaOrmStorage, TaskType};

fn print_queue(task_type: TaskType, queue: &[QueueSlot]) {
    println!("{}:", task_type.display_name().bold().green());
    if queue.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for slot in queue {
        println!(
            "  {}. {} ({})",
            slot.position,
            slot.worker.name,
            slot.worker.title.display_name()
        );
    }
}

/// 为所有 worker 补齐队列项并打印队列状态
pub async fn init_queues(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let service = QueueService::new(storage);

    println!("{}", "Initializing task queues...".yellow());
    let report = service.initialize_all().await?;

    if report.workers == 0 {
        println!(
            "{} No workers found. Please add workers first.",
            "⚠".bold().yellow()
        );
        return Ok(());
    }

    println!(
        "{} Queues initialized for {} workers ({} entries created)",
        "✓".bold().green(),
        report.workers,
        report.created
    );
    println!();
    println!("{}", "Current queue status:".bold());
    for (task_type, queue) in service.all_queues().await? {
        print_queue(task_type, &queue);
    }
    Ok(())
}

/// 打印单个或全部队列
pub async fn show_queues(
    storage: Arc<SeaOrmStorage>,
    task_type: Option<String>,
) -> Result<(), CliError> {
    let service = QueueService::new(storage);

    match task_type {
        Some(raw) => {
            let task_type: TaskType = raw.parse()?;
            let queue = service.queue_for_task(task_type).await?;
            print_queue(task_type, &queue);
        }
        None => {
            for (task_type, queue) in service.all_queues().await? {
                print_queue(task_type, &queue);
            }
        }
    }
    Ok(())
}
