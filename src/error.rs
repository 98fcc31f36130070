//! 错误处理模块
//!
//! 定义插件的统一错误类型

use thiserror::Error;

/// 插件的主要错误类型
#[derive(Error, Debug)]
pub enum PluginError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 必填项缺失
    #[error("缺少必填配置项: {field}")]
    MissingField { field: String },

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 提交版本号不足以截取短版本号
    #[error("提交版本号过短: '{revision}' 少于 {required} 个字符")]
    RevisionTooShort { revision: String, required: usize },

    /// 请求未能完成（连接、DNS、超时等）
    #[error("通知请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 网关返回非200状态码
    #[error("网关返回错误: HTTP {status} {body}")]
    Delivery { status: u16, body: String },

    /// 请求头的值无法编码
    #[error("请求头 {name} 无效: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// HTTP客户端创建失败
    #[error("创建HTTP客户端失败: {0}")]
    Client(String),
}

impl NotificationError {
    /// 网关返回的状态码（如有）
    pub fn status(&self) -> Option<u16> {
        match self {
            NotificationError::Delivery { status, .. } => Some(*status),
            NotificationError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_reports_status_and_body() {
        let err = NotificationError::Delivery {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("forbidden"));
    }

    #[test]
    fn test_plugin_error_from_config_error() {
        let err: PluginError = ConfigError::MissingField {
            field: "topic".to_string(),
        }
        .into();
        assert!(matches!(err, PluginError::Config(_)));
        assert!(err.to_string().contains("topic"));
    }
}
