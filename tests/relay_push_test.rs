use github_clickup_relay::clickup::{ClickUpClient, ClickUpConfig};
use github_clickup_relay::relay::{PushSummary, relay_push};
use github_clickup_relay::webhook::PushEvent;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ClickUpClient {
    ClickUpClient::new(ClickUpConfig {
        api_key: "pk_test_key".to_string(),
        base_url: format!("{}/api/v2", server.uri()),
    })
    .unwrap()
}

#[tokio::test]
async fn summary_counts_each_commit_outcome() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/task/ok1/comment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/task/down2/comment"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let event: PushEvent = serde_json::from_value(json!({
        "commits": [
            { "message": "feat: https://app.clickup.com/t/ok1" },
            { "message": "fix: https://app.clickup.com/t/down2" },
            { "message": "chore: no link" }
        ]
    }))
    .unwrap();

    let summary = relay_push(&client_for(&mock_server), &event).await;

    assert_eq!(
        summary,
        PushSummary {
            commits: 3,
            without_task: 1,
            commented: 1,
            failed: 1,
        }
    );
}

#[tokio::test]
async fn wrongly_typed_message_only_skips_that_commit() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/task/good1/comment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let event: PushEvent = serde_json::from_value(json!({
        "commits": [
            { "message": "https://app.clickup.com/t/good1" },
            { "message": 42 }
        ]
    }))
    .unwrap();

    let summary = relay_push(&client_for(&mock_server), &event).await;

    assert_eq!(summary.commits, 2);
    assert_eq!(summary.commented, 1);
    assert_eq!(summary.without_task, 1);
}
