//! Integration tests for chat and the event-stream endpoint's
//! validation. The streaming happy path is covered by the event bus's
//! own tests; oneshot requests cannot observe an open stream.

mod common;

use axum::http::StatusCode;
use trailmark_test_support::fixtures;

#[tokio::test]
async fn test_chat_requires_membership_in_the_game() {
    let app = common::build_test_app();
    app.seed_demo_hunt();
    let other = fixtures::active_game("other");
    app.store.insert_game(other.clone());

    let token = app.join("demo", "ALPHA").await;

    let (status, _) = common::post_json(
        &app.router,
        "/api/v1/games/demo/chat",
        Some(&token),
        &serde_json::json!({ "message": "on our way" }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // Alpha belongs to "demo", not "other".
    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/games/other/chat",
        Some(&token),
        &serde_json::json!({ "message": "wrong room" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "team does not belong to this game");
}

#[tokio::test]
async fn test_event_stream_rejects_unknown_kind_and_game() {
    let app = common::build_test_app();
    app.seed_demo_hunt();

    let (status, json) =
        common::get_json(&app.router, "/api/v1/games/demo/events/metrics", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "unknown event kind 'metrics'");

    let (status, _) =
        common::get_json(&app.router, "/api/v1/games/ghost/events/scan", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
