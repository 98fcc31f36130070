//! 配置加载器实现
//!
//! 将命令行参数（含环境变量）转换为验证过的通知配置和构建上下文

use crate::cli::args::Args;
use crate::config::types::{
    validate_notification_config, Auth, BuildContext, BuildStatus, NotificationConfig,
};
use crate::error::{ConfigError, Result};

/// 配置加载器trait，定义配置加载接口
pub trait ConfigLoader: Send + Sync {
    /// 加载通知投递配置
    ///
    /// # 返回
    /// * `Result<NotificationConfig>` - 验证通过的配置或错误
    fn load_notification_config(&self) -> Result<NotificationConfig>;

    /// 加载构建上下文
    ///
    /// # 返回
    /// * `Result<BuildContext>` - 构建上下文
    fn load_build_context(&self) -> Result<BuildContext>;

    /// 验证配置
    ///
    /// # 参数
    /// * `config` - 要验证的配置
    ///
    /// # 返回
    /// * `Result<()>` - 验证结果
    fn validate(&self, config: &NotificationConfig) -> Result<()>;
}

/// 基于命令行参数的配置加载器
#[derive(Debug, Clone)]
pub struct ArgsConfigLoader<'a> {
    args: &'a Args,
}

impl<'a> ArgsConfigLoader<'a> {
    /// 创建新的加载器
    pub fn new(args: &'a Args) -> Self {
        Self { args }
    }

    /// 清理标签列表：去除空白和空项
    fn normalize_tags(tags: &[String]) -> Vec<String> {
        tags.iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl ConfigLoader for ArgsConfigLoader<'_> {
    fn load_notification_config(&self) -> Result<NotificationConfig> {
        let topic = self
            .args
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "topic".to_string(),
            })?;

        let config = NotificationConfig {
            base_url: self.args.url.trim().to_string(),
            topic: topic.to_string(),
            auth: Auth::from_credentials(
                self.args.token.as_deref(),
                self.args.username.as_deref(),
                self.args.password.as_deref(),
            ),
            priority: self.args.priority.trim().to_string(),
            tags: Self::normalize_tags(&self.args.tags),
            timeout_seconds: self.args.timeout,
        };

        self.validate(&config)?;

        tracing::debug!(
            "通知配置: endpoint={}, priority={}, tags={:?}",
            config.endpoint(),
            config.priority,
            config.tags
        );

        Ok(config)
    }

    fn load_build_context(&self) -> Result<BuildContext> {
        let args = self.args;
        let context = BuildContext {
            repo_name: args.repo_name.clone(),
            commit_ref: args.commit_ref.clone(),
            commit_branch: args.commit_branch.clone(),
            revision: args.commit_sha.clone(),
            commit_message: args.commit_message.clone(),
            commit_link: args.commit_link.clone(),
            build_number: args.build_number,
            build_status: BuildStatus::from(args.build_status.as_str()),
            build_link: args.build_link.clone(),
            tag_name: args.tag.clone(),
        };

        tracing::debug!("构建上下文: {:?}", context);

        Ok(context)
    }

    fn validate(&self, config: &NotificationConfig) -> Result<()> {
        validate_notification_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}
