//! 命令行参数定义
//!
//! 使用clap定义插件的命令行接口，所有参数均可通过Drone注入的环境变量提供

use clap::Parser;
use std::str::FromStr;

/// Drone ntfy 插件 - 将构建结果推送到ntfy网关
#[derive(Parser, Debug, Clone)]
#[command(
    name = "drone-ntfy",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 日志级别（无法识别时回退到info，不影响通知发送）
    #[arg(
        long,
        default_value = "info",
        help = "日志级别: trace/debug/info/warn/error",
        env = "PLUGIN_LOG_LEVEL"
    )]
    pub log_level: String,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", env = "PLUGIN_LOG_JSON")]
    pub log_json: bool,

    /// 网关地址
    #[arg(
        long,
        value_name = "URL",
        default_value = crate::config::types::DEFAULT_BASE_URL,
        help = "ntfy网关地址",
        env = "PLUGIN_URL"
    )]
    pub url: String,

    /// 目标主题
    #[arg(long, value_name = "TOPIC", help = "目标主题", env = "PLUGIN_TOPIC")]
    pub topic: Option<String>,

    /// 用户名
    #[arg(long, help = "Basic认证用户名", env = "PLUGIN_USERNAME")]
    pub username: Option<String>,

    /// 密码
    #[arg(
        long,
        help = "Basic认证密码",
        env = "PLUGIN_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// 访问令牌（优先于用户名密码）
    #[arg(
        long,
        help = "Bearer访问令牌",
        env = "PLUGIN_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// 消息优先级
    #[arg(
        long,
        default_value = crate::config::types::DEFAULT_PRIORITY,
        help = "消息优先级",
        env = "PLUGIN_PRIORITY"
    )]
    pub priority: String,

    /// 基础标签（逗号分隔）
    #[arg(
        long,
        value_delimiter = ',',
        help = "基础标签（逗号分隔）",
        env = "PLUGIN_TAGS"
    )]
    pub tags: Vec<String>,

    /// 请求超时时间（秒）
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = crate::config::types::DEFAULT_TIMEOUT_SECONDS,
        help = "请求超时时间（秒）",
        env = "PLUGIN_TIMEOUT"
    )]
    pub timeout: u64,

    /// 只打印消息，不发送
    #[arg(long, help = "只打印消息，不发送", env = "PLUGIN_DRY_RUN")]
    pub dry_run: bool,

    /// 仓库名称
    #[arg(long, default_value = "", env = "DRONE_REPO_NAME")]
    pub repo_name: String,

    /// 提交引用
    #[arg(long, default_value = "", env = "DRONE_COMMIT_REF")]
    pub commit_ref: String,

    /// 提交版本号
    #[arg(long, default_value = "", env = "DRONE_COMMIT_SHA")]
    pub commit_sha: String,

    /// 提交信息
    #[arg(long, default_value = "", env = "DRONE_COMMIT_MESSAGE")]
    pub commit_message: String,

    /// 提交链接
    #[arg(long, default_value = "", env = "DRONE_COMMIT_LINK")]
    pub commit_link: String,

    /// 提交分支
    #[arg(long, default_value = "", env = "DRONE_COMMIT_BRANCH")]
    pub commit_branch: String,

    /// 构建编号
    #[arg(long, default_value_t = 0, env = "DRONE_BUILD_NUMBER")]
    pub build_number: u64,

    /// 构建状态
    #[arg(long, default_value = "", env = "DRONE_BUILD_STATUS")]
    pub build_status: String,

    /// 构建链接
    #[arg(long, default_value = "", env = "DRONE_BUILD_LINK")]
    pub build_link: String,

    /// 标签名称
    #[arg(long, default_value = "", env = "DRONE_TAG")]
    pub tag: String,
}

impl Args {
    /// 解析日志级别
    ///
    /// # 返回
    /// * `Option<LogLevel>` - 无法识别时为 `None`
    pub fn resolved_log_level(&self) -> Option<LogLevel> {
        self.log_level.parse().ok()
    }
}

/// 日志级别枚举
#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 跟踪级别
    Trace,
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    /// 大小写不敏感，接受常见别名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" | "" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            other => Err(format!("未知日志级别: {other}")),
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}
