//! 消息组装模块
//!
//! 根据构建上下文推导通知的标题、标签、正文和动作链接，不做任何IO

use crate::config::types::{BuildContext, BuildStatus, NotificationConfig, TriggerEvent};
use crate::error::NotificationError;
use serde::Serialize;

/// 短版本号长度
pub const SHORT_REVISION_LEN: usize = 8;

/// 构建成功标签
pub const SUCCESS_TAG: &str = "white_check_mark";
/// 构建失败标签
pub const FAILURE_TAG: &str = "x";
/// 其他状态标签
pub const UNKNOWN_TAG: &str = "grey_question";

/// 通知上的可点击动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// 动作类型
    pub action: String,
    /// 按钮文字
    pub label: String,
    /// 目标链接
    pub url: String,
}

impl Action {
    /// 创建打开链接的动作
    pub fn view(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            action: "view".to_string(),
            label: label.into(),
            url: url.into(),
        }
    }

    /// 渲染为 `<action>, <label>, <url>`
    pub fn render(&self) -> String {
        format!("{}, {}, {}", self.action, self.label, self.url)
    }
}

/// 推导出的通知消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedMessage {
    /// 消息标题
    pub title: String,
    /// 标签列表
    pub tags: Vec<String>,
    /// 消息正文
    pub body: String,
    /// 动作列表
    pub actions: Vec<Action>,
}

impl DerivedMessage {
    /// Tags 请求头
    pub fn tags_header(&self) -> String {
        self.tags.join(",")
    }

    /// Actions 请求头
    pub fn actions_header(&self) -> String {
        self.actions
            .iter()
            .map(Action::render)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// 构建状态对应的标签
pub fn outcome_tag(status: &BuildStatus) -> &'static str {
    match status {
        BuildStatus::Success => SUCCESS_TAG,
        BuildStatus::Failure => FAILURE_TAG,
        BuildStatus::Other(_) => UNKNOWN_TAG,
    }
}

/// 截取短版本号
fn short_revision(revision: &str) -> Result<&str, NotificationError> {
    revision
        .get(..SHORT_REVISION_LEN)
        .ok_or_else(|| NotificationError::RevisionTooShort {
            revision: revision.to_string(),
            required: SHORT_REVISION_LEN,
        })
}

/// 组装通知消息
///
/// # 参数
/// * `context` - 构建上下文
/// * `config` - 通知配置（提供基础标签）
///
/// # 返回
/// * `Result<DerivedMessage, NotificationError>` - 推导出的消息，分支推送时版本号过短会返回错误
pub fn compose(
    context: &BuildContext,
    config: &NotificationConfig,
) -> Result<DerivedMessage, NotificationError> {
    let title = format!("Build #{} {}", context.build_number, context.build_status);
    let mut tags = config.tags.clone();
    let build_action = Action::view("Build", &context.build_link);

    let (body, actions) = match context.event() {
        TriggerEvent::Tag { name } => {
            let body = format!("Tag {name} created");
            tags.push(name);
            (body, vec![build_action])
        }
        TriggerEvent::Branch { branch } => {
            let body = format!(
                "[{}] {}",
                short_revision(&context.revision)?,
                context.commit_message
            );
            tags.push(format!("{}/{}", context.repo_name, branch));
            (
                body,
                vec![build_action, Action::view("Changes", &context.commit_link)],
            )
        }
    };

    tags.push(outcome_tag(&context.build_status).to_string());

    Ok(DerivedMessage {
        title,
        tags,
        body,
        actions,
    })
}
