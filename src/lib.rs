//! Drone ntfy - 构建通知插件
//!
//! 在Drone流水线中运行一次，将构建结果推送到ntfy网关：
//! - 根据标签推送/分支推送组装标题、标签、正文和动作链接
//! - 支持Bearer令牌或Basic认证
//! - 单次请求，不重试

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use config::{BuildContext, BuildStatus, NotificationConfig};
pub use error::{NotificationError, PluginError};
pub use notification::{compose, DerivedMessage, NtfySender};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
