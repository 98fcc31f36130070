//! 配置管理模块
//!
//! 提供构建上下文和通知配置的加载与验证功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{ArgsConfigLoader, ConfigLoader};
pub use types::{
    validate_notification_config, Auth, BuildContext, BuildStatus, NotificationConfig,
    TriggerEvent,
};
