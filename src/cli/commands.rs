//! 命令处理逻辑
//!
//! 实现插件执行流程：加载配置、组装消息、发送通知

use crate::cli::args::Args;
use crate::config::{ArgsConfigLoader, BuildContext, ConfigLoader, NotificationConfig};
use crate::error::Result;
use crate::logging::LoggingSystem;
use crate::notification::{compose, DerivedMessage, NoOpSender, NotificationSender, NtfySender};
use async_trait::async_trait;
use tracing::info;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令，返回需要输出到stdout的结果
    async fn execute(&self, args: &Args) -> Result<String>;
}

/// 通知命令
#[derive(Debug, Default)]
pub struct NotifyCommand {
    /// 日志系统（用于记录投递结果）
    logging: Option<LoggingSystem>,
}

impl NotifyCommand {
    /// 创建通知命令
    pub fn new(logging: Option<LoggingSystem>) -> Self {
        Self { logging }
    }

    /// 发送消息
    ///
    /// # 参数
    /// * `sender` - 通知发送器
    /// * `config` - 通知配置
    /// * `context` - 构建上下文
    ///
    /// # 返回
    /// * `Result<String>` - 发送器返回的成功提示
    pub async fn notify(
        &self,
        sender: &dyn NotificationSender,
        config: &NotificationConfig,
        context: &BuildContext,
    ) -> Result<String> {
        let message = compose(context, config)?;
        info!("发送构建通知: {} -> {}", message.title, config.endpoint());

        let result = sender.send_message(&message).await;

        if let Some(logging) = &self.logging {
            let error = result.as_ref().err().map(ToString::to_string);
            logging.delivery_log(&config.endpoint(), result.is_ok(), error.as_deref());
        }

        Ok(result?)
    }

    /// 试运行：输出推导出的消息
    fn render_dry_run(message: &DerivedMessage, config: &NotificationConfig) -> Result<String> {
        let preview = serde_json::json!({
            "endpoint": config.endpoint(),
            "priority": config.priority,
            "message": message,
        });
        Ok(serde_json::to_string_pretty(&preview)?)
    }
}

#[async_trait]
impl Command for NotifyCommand {
    async fn execute(&self, args: &Args) -> Result<String> {
        let loader = ArgsConfigLoader::new(args);
        let config = loader.load_notification_config()?;
        let context = loader.load_build_context()?;

        if args.dry_run {
            let message = compose(&context, &config)?;
            let output = Self::render_dry_run(&message, &config)?;
            NoOpSender.send_message(&message).await?;
            return Ok(output);
        }

        let sender = NtfySender::new(config.clone())?;
        self.notify(&sender, &config, &context).await
    }
}
