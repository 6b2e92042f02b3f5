//! List workers command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::storage::SeaOrmStorage;

pub async fn list_workers(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let workers = storage
        .list_workers()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load workers: {}", e)))?;

    if workers.is_empty() {
        println!("{} No workers found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Workers:".bold().green());
    println!();
    for worker in &workers {
        let department = worker
            .department
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("-");
        println!(
            "  {:>4}  {} {} {}",
            worker.id.to_string().dimmed(),
            worker.name.cyan(),
            format!("({})", worker.title.display_name()).yellow(),
            format!(
                "[{}] hard chores: {}, outer partner: {}",
                department, worker.hard_chores_counter, worker.outer_partner_counter
            )
            .dimmed()
        );
    }
    println!();
    println!("{} {} workers", "Total:".bold(), workers.len());
    Ok(())
}
