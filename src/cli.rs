//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Workers Jobs Manager - duty scheduling with fairness counters
#[derive(Parser)]
#[command(name = "dutyroster")]
#[command(version)]
#[command(about = "Guard-duty and full-day task scheduling for workers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create missing queue entries for every worker and print the queues
    InitQueues,

    /// List workers with their fairness counters
    Workers,

    /// Print one task queue, or all of them
    Queue {
        /// Task type (e.g. kitchen, guard_duty)
        task_type: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// 无子命令或 `serve` 时进入服务器模式
    pub fn is_server_mode(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve))
    }
}
