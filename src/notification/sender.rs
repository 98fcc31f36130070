//! 通知发送器模块
//!
//! 定义通知发送的trait和基础实现

use crate::error::NotificationError;
use crate::notification::composer::DerivedMessage;
use async_trait::async_trait;
use tracing::info;

/// 发送成功时返回的提示
pub const SUCCESS_MESSAGE: &str = "[SUCCESS] Notification sent";

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送通知消息
    ///
    /// # 参数
    /// * `message` - 推导出的通知消息
    ///
    /// # 返回
    /// * `Result<String, NotificationError>` - 成功提示或错误
    async fn send_message(&self, message: &DerivedMessage) -> Result<String, NotificationError>;
}

/// 空的通知发送器实现（用于试运行）
pub struct NoOpSender;

#[async_trait]
impl NotificationSender for NoOpSender {
    async fn send_message(&self, message: &DerivedMessage) -> Result<String, NotificationError> {
        // 只记录，不发送
        info!(
            "试运行，跳过发送: title={}, tags={}",
            message.title,
            message.tags_header()
        );
        Ok(SUCCESS_MESSAGE.to_string())
    }
}
