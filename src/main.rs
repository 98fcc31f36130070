//! Drone ntfy 插件入口
//!
//! 读取Drone环境变量，发送一次构建通知，按结果设置退出码

use anyhow::{Context, Result};
use clap::Parser;
use drone_ntfy::cli::{Args, Command, LogLevel, NotifyCommand};
use drone_ntfy::logging::{LogConfig, LoggingSystem};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统，日志级别无法识别时回退到info
    let log_level = args.resolved_log_level();
    let log_config = LogConfig {
        level: log_level.clone().unwrap_or(LogLevel::Info).into(),
        json_format: args.log_json,
        ..Default::default()
    };

    let logging = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    if log_level.is_none() {
        warn!("未知日志级别 '{}'，使用 info", args.log_level);
    }

    info!("{} v{} 启动", drone_ntfy::APP_NAME, drone_ntfy::VERSION);

    match NotifyCommand::new(Some(logging)).execute(&args).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("通知发送失败: {}", e);
            std::process::exit(1);
        }
    }
}
