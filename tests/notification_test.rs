//! 通知发送测试
//!
//! 使用mockito模拟ntfy网关，验证请求格式、认证方式和错误处理

use drone_ntfy::config::{Auth, BuildContext, BuildStatus, NotificationConfig};
use drone_ntfy::error::NotificationError;
use drone_ntfy::notification::{compose, NotificationSender, NtfySender, SUCCESS_MESSAGE};
use mockito::Matcher;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

fn create_branch_context() -> BuildContext {
    BuildContext {
        repo_name: "acme/app".to_string(),
        commit_ref: "refs/heads/main".to_string(),
        commit_branch: "main".to_string(),
        revision: "abcdef1234567890".to_string(),
        commit_message: "fix bug".to_string(),
        commit_link: "http://git/acme/app/commit/abcdef12".to_string(),
        build_number: 42,
        build_status: BuildStatus::Success,
        build_link: "http://ci/42".to_string(),
        tag_name: String::new(),
    }
}

fn create_config(base_url: &str) -> NotificationConfig {
    let mut config = NotificationConfig::new("alerts");
    config.base_url = base_url.to_string();
    config.timeout_seconds = 5;
    config
}

#[tokio::test]
async fn test_branch_push_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .match_header("title", "Build #42 success")
        .match_header("priority", "default")
        .match_header("tags", "acme/app/main,white_check_mark")
        .match_header(
            "actions",
            "view, Build, http://ci/42; view, Changes, http://git/acme/app/commit/abcdef12",
        )
        .match_body("[abcdef12] fix bug")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let config = create_config(&server.url());
    let message = compose(&create_branch_context(), &config).unwrap();
    assert_eq!(message.title, "Build #42 success");
    assert_eq!(message.tags, vec!["acme/app/main", "white_check_mark"]);

    let sender = NtfySender::new(config).unwrap();
    let result = sender.send_message(&message).await.unwrap();

    assert_eq!(result, SUCCESS_MESSAGE);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_tag_push_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .match_header("tags", "v1.0,white_check_mark")
        .match_header("actions", "view, Build, http://ci/42")
        .match_body("Tag v1.0 created")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut context = create_branch_context();
    context.commit_ref = "refs/tags/v1.0".to_string();
    context.tag_name = "v1.0".to_string();

    let config = create_config(&server.url());
    let message = compose(&context, &config).unwrap();
    assert_eq!(message.body, "Tag v1.0 created");
    assert_eq!(message.actions.len(), 1);

    let sender = NtfySender::new(config).unwrap();
    assert!(sender.send_message(&message).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_token_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .match_header("authorization", "Bearer tk_abc")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut config = create_config(&server.url());
    config.auth = Auth::from_credentials(Some("tk_abc"), Some("user"), Some("pass"));
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    assert!(sender.send_message(&message).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_basic_auth_when_token_empty() {
    let mut server = mockito::Server::new_async().await;
    // base64("user:pass")
    let mock = server
        .mock("POST", "/alerts")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut config = create_config(&server.url());
    config.auth = Auth::from_credentials(Some(""), Some("user"), Some("pass"));
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    assert!(sender.send_message(&message).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anonymous_basic_auth_header() {
    let mut server = mockito::Server::new_async().await;
    // base64(":")
    let mock = server
        .mock("POST", "/alerts")
        .match_header("authorization", "Basic Og==")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let config = create_config(&server.url());
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    assert!(sender.send_message(&message).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_base_tags_and_trailing_slash() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .match_header("tags", "ci,drone,acme/app/main,x")
        .match_header("priority", "high")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut config = create_config(&format!("{}/", server.url()));
    config.tags = vec!["ci".to_string(), "drone".to_string()];
    config.priority = "high".to_string();

    let mut context = create_branch_context();
    context.build_status = BuildStatus::Failure;
    let message = compose(&context, &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    assert!(sender.send_message(&message).await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_200_is_delivery_error_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .with_status(403)
        .with_body("forbidden")
        .expect(1)
        .create_async()
        .await;

    let config = create_config(&server.url());
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    let result = sender.send_message(&message).await;

    match result {
        Err(NotificationError::Delivery { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("期望投递错误, 实际: {other:?}"),
    }
    // 只请求一次
    mock.assert_async().await;
}

#[tokio::test]
async fn test_other_success_codes_are_not_accepted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .with_status(202)
        .expect(1)
        .create_async()
        .await;

    let config = create_config(&server.url());
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    let err = sender.send_message(&message).await.unwrap_err();

    assert_eq!(err.status(), Some(202));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = create_config("http://127.0.0.1:1");
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    let result = sender.send_message(&message).await;

    assert!(matches!(result, Err(NotificationError::Transport(_))));
}

#[tokio::test]
async fn test_stalled_gateway_hits_configured_timeout() {
    // 接受连接但从不响应
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stall = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let mut config = create_config(&format!("http://{addr}"));
    config.timeout_seconds = 1;
    let message = compose(&create_branch_context(), &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    let started = Instant::now();
    let result = sender.send_message(&message).await;
    let elapsed = started.elapsed();
    stall.abort();

    match result {
        Err(NotificationError::Transport(e)) => assert!(e.is_timeout(), "期望超时错误: {e}"),
        other => panic!("期望超时错误, 实际: {other:?}"),
    }
    assert!(elapsed < Duration::from_secs(10), "超时未生效: {elapsed:?}");
}

#[tokio::test]
async fn test_unknown_status_sends_question_tag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/alerts")
        .match_header("title", "Build #42 killed")
        .match_header("tags", Matcher::Regex("grey_question$".to_string()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut context = create_branch_context();
    context.build_status = BuildStatus::from("killed");

    let config = create_config(&server.url());
    let message = compose(&context, &config).unwrap();

    let sender = NtfySender::new(config).unwrap();
    assert!(sender.send_message(&message).await.is_ok());
    mock.assert_async().await;
}
