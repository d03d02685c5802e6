//! Host session entry point.
//!
//! Loads configuration, connects, runs the lookup and both procedures
//! concurrently, then releases the connection. Exit status: 0 when every
//! operation succeeded, 1 on a config or connection failure, 2 when at least
//! one operation failed.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::config::AppConfig;
use host_session::cli::Cli;
use host_session::{run_session, HostSession, SessionReport};

const SERVICE_NAME: &str = "host-session";

#[tokio::main]
async fn main() -> ExitCode {
    // .env 文件可选，环境变量优先
    let dotenv = dotenvy::dotenv();

    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "Ignoring unreadable .env file");
        }
    }

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) if report.all_succeeded() => ExitCode::SUCCESS,
        Ok(report) => {
            info!(failures = report.failures(), "Some operations failed");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "Session aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<SessionReport> {
    // 加载配置
    let mut config = AppConfig::load_with_service(SERVICE_NAME)?;
    cli.apply(&mut config);
    let connection = config.connection_config()?;

    info!(
        service = %config.service_name,
        profile = %config.profile,
        target_db = %connection.display_target(),
        "Starting session"
    );

    let report = run_session(HostSession::connect(&connection), &cli.plan()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(report)
}
