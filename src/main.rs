use clap::Parser;

use dutyroster::cli::Cli;
use dutyroster::config::{get_config, init_config};
use dutyroster::interfaces::cli::run_cli_command;
use dutyroster::runtime::modes::{self, Mode};
use dutyroster::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_config();

    let cli = Cli::parse();

    match modes::detect_mode(&cli) {
        Mode::Server => {
            let config = get_config();
            // guard 必须存活到进程结束
            let _log_guard = init_logging(&config.logging)?;
            modes::run_server().await
        }
        Mode::Cli => {
            let Some(command) = cli.command else {
                return Ok(());
            };
            if let Err(e) = run_cli_command(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
