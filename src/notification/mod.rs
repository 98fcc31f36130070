//! 通知模块
//!
//! 提供消息组装和ntfy通知发送功能

pub mod composer;
pub mod ntfy;
pub mod sender;

// 重新导出主要类型
pub use composer::{compose, Action, DerivedMessage};
pub use ntfy::NtfySender;
pub use sender::{NoOpSender, NotificationSender, SUCCESS_MESSAGE};
