mod common;

use common::{repo, FakeClient};
use repodeck::client::ClientError;
use repodeck::detail::{DetailState, DetailView};

#[tokio::test]
async fn test_detail_loads_with_stats() {
    let client = FakeClient::new(vec![repo(1, "my-api")]);
    let mut view = DetailView::new("my-api");
    assert_eq!(view.state(), &DetailState::Loading);

    view.load(&client).await;

    let loaded = view.repository().unwrap();
    assert_eq!(loaded.name, "my-api");
    assert_eq!(loaded.stats.unwrap().stargazers_count, 5);
    assert!(view.last_updated("%Y-%m-%d").unwrap().starts_with("Last updated: "));
    assert_eq!(client.calls(), vec!["get my-api"]);
}

#[tokio::test]
async fn test_missing_repository_degrades_inline() {
    let client = FakeClient::new(vec![repo(1, "my-api")]);
    let mut view = DetailView::new("nope");

    match view.load(&client).await {
        DetailState::Unavailable { reason } => assert!(reason.contains("nope not found")),
        other => panic!("expected unavailable, got {other:?}"),
    }
    assert!(view.repository().is_none());
    assert!(view.last_updated("%Y-%m-%d").is_none());
}

#[tokio::test]
async fn test_network_failure_degrades_inline() {
    let client = FakeClient::new(vec![repo(1, "my-api")]);
    client.fail_next(ClientError::Network("offline".to_string()));
    let mut view = DetailView::new("my-api");

    view.load(&client).await;
    assert!(matches!(view.state(), DetailState::Unavailable { .. }));

    // A later retry succeeds.
    view.load(&client).await;
    assert!(matches!(view.state(), DetailState::Loaded(_)));
}
