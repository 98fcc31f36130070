//! ntfy通知发送器模块
//!
//! 实现向ntfy网关发布消息的功能

use crate::config::types::{Auth, NotificationConfig};
use crate::error::NotificationError;
use crate::notification::composer::DerivedMessage;
use crate::notification::sender::{NotificationSender, SUCCESS_MESSAGE};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

/// ntfy通知发送器
pub struct NtfySender {
    /// HTTP客户端
    client: Client,
    /// 投递配置
    config: NotificationConfig,
}

impl NtfySender {
    /// 创建新的ntfy发送器
    ///
    /// # 参数
    /// * `config` - 通知配置
    ///
    /// # 返回
    /// * `Result<Self, NotificationError>` - 发送器实例
    pub fn new(config: NotificationConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| NotificationError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 投递地址
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// 构建消息请求头
    fn build_headers(&self, message: &DerivedMessage) -> Result<HeaderMap, NotificationError> {
        let mut headers = HeaderMap::new();
        let fields = [
            ("title", message.title.clone()),
            ("priority", self.config.priority.clone()),
            ("tags", message.tags_header()),
            ("actions", message.actions_header()),
        ];

        for (name, value) in fields {
            // 允许UTF-8字节（分支名、标签可能包含非ASCII字符），拒绝控制字符
            let value = HeaderValue::from_bytes(value.as_bytes()).map_err(|e| {
                NotificationError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(HeaderName::from_static(name), value);
        }

        Ok(headers)
    }

    /// 附加认证信息
    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth {
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

/// 将请求格式化为可读文本，用于调试输出
///
/// Authorization 头的值会被隐藏
pub fn format_request(request: &reqwest::Request) -> String {
    let mut lines = vec![format!(
        "{} {} {:?}",
        request.method(),
        request.url(),
        request.version()
    )];

    for (name, value) in request.headers() {
        let value = if name == AUTHORIZATION {
            "***".to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        lines.push(format!("{name}: {value}"));
    }

    if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
        lines.push(String::new());
        lines.push(String::from_utf8_lossy(body).into_owned());
    }

    lines.join("\n")
}

#[async_trait]
impl NotificationSender for NtfySender {
    async fn send_message(&self, message: &DerivedMessage) -> Result<String, NotificationError> {
        let endpoint = self.endpoint();
        let headers = self.build_headers(message)?;

        let request = self
            .apply_auth(self.client.post(&endpoint))
            .headers(headers)
            .body(message.body.clone())
            .build()?;

        debug!("发送通知请求:\n{}", format_request(&request));

        let response = self.client.execute(request).await.map_err(|e| {
            debug!("通知请求失败: {} - {}", endpoint, e);
            NotificationError::Transport(e)
        })?;

        let status = response.status();
        if status == StatusCode::OK {
            debug!("网关返回 {}: {}", status, endpoint);
            Ok(SUCCESS_MESSAGE.to_string())
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!("网关返回错误: {} - {}", status, body);
            Err(NotificationError::Delivery {
                status: status.as_u16(),
                body,
            })
        }
    }
}
