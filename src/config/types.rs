//! 配置数据结构定义
//!
//! 定义构建上下文、通知投递配置及其验证逻辑

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 标签推送的引用前缀
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// 默认网关地址
pub const DEFAULT_BASE_URL: &str = "https://ntfy.sh";

/// 默认消息优先级
pub const DEFAULT_PRIORITY: &str = "default";

/// 默认请求超时时间（秒）
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 主题最大长度
pub const MAX_TOPIC_LEN: usize = 64;

/// 构建状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStatus {
    /// 构建成功
    Success,
    /// 构建失败
    Failure,
    /// 其他状态，保留原始文本
    Other(String),
}

impl From<&str> for BuildStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "success" => BuildStatus::Success,
            "failure" => BuildStatus::Failure,
            other => BuildStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Failure => write!(f, "failure"),
            BuildStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// 触发构建的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// 标签推送
    Tag { name: String },
    /// 分支推送
    Branch { branch: String },
}

/// 构建上下文，由CI环境提供
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildContext {
    /// 仓库名称
    pub repo_name: String,
    /// 提交引用（分支引用或标签引用）
    pub commit_ref: String,
    /// 提交所在分支
    pub commit_branch: String,
    /// 提交版本号
    pub revision: String,
    /// 提交信息
    pub commit_message: String,
    /// 提交链接
    pub commit_link: String,
    /// 构建编号
    pub build_number: u64,
    /// 构建状态
    pub build_status: BuildStatus,
    /// 构建链接
    pub build_link: String,
    /// 标签名称（仅标签推送有效）
    pub tag_name: String,
}

impl BuildContext {
    /// 是否为标签推送
    pub fn is_tag_push(&self) -> bool {
        self.commit_ref.contains(TAG_REF_PREFIX)
    }

    /// 解析触发事件
    ///
    /// 标签推送时若CI未提供标签名，则从引用中截取
    pub fn event(&self) -> TriggerEvent {
        if self.is_tag_push() {
            let name = if self.tag_name.is_empty() {
                self.commit_ref
                    .rsplit_once(TAG_REF_PREFIX)
                    .map(|(_, name)| name.to_string())
                    .unwrap_or_default()
            } else {
                self.tag_name.clone()
            };
            TriggerEvent::Tag { name }
        } else {
            TriggerEvent::Branch {
                branch: self.commit_branch.clone(),
            }
        }
    }
}

/// 网关认证方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Auth {
    /// Bearer令牌
    Bearer(String),
    /// HTTP Basic认证，用户名和密码都可以为空
    Basic { username: String, password: String },
}

impl Auth {
    /// 根据配置项选择认证方式，令牌优先
    pub fn from_credentials(
        token: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        match present(token) {
            Some(token) => Auth::Bearer(token.trim().to_string()),
            None => Auth::Basic {
                username: present(username).unwrap_or_default().to_string(),
                password: present(password).unwrap_or_default().to_string(),
            },
        }
    }
}

/// 过滤空白配置项
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// 通知投递配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 网关地址
    pub base_url: String,
    /// 目标主题
    pub topic: String,
    /// 认证方式
    pub auth: Auth,
    /// 消息优先级
    pub priority: String,
    /// 基础标签列表
    pub tags: Vec<String>,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

impl NotificationConfig {
    /// 创建带默认值的配置
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            topic: topic.into(),
            auth: Auth::Basic {
                username: String::new(),
                password: String::new(),
            },
            priority: DEFAULT_PRIORITY.to_string(),
            tags: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// 投递地址 `<base_url>/<topic>`
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.topic)
    }

    /// 请求超时时间
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果
pub fn validate_notification_config(config: &NotificationConfig) -> Result<(), String> {
    if config.topic.trim().is_empty() {
        return Err("主题不能为空".to_string());
    }

    // 主题直接拼接进URL，'#'、'?'、'/'、空白等字符会改变实际投递路径
    let valid_topic = config.topic.len() <= MAX_TOPIC_LEN
        && config
            .topic
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_topic {
        return Err(format!(
            "主题 '{}' 只能包含字母、数字、'_'、'-'，且不超过 {} 个字符",
            config.topic, MAX_TOPIC_LEN
        ));
    }

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(format!(
            "网关地址 '{}' 必须以 http:// 或 https:// 开头",
            config.base_url
        ));
    }

    if config.priority.trim().is_empty() {
        return Err("优先级不能为空".to_string());
    }

    if config.timeout_seconds == 0 {
        return Err("请求超时时间必须大于0".to_string());
    }

    Ok(())
}
