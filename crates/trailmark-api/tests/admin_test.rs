//! Integration tests for the administrative lifecycle endpoints.

mod common;

use axum::http::StatusCode;
use trailmark_test_support::fixtures;

#[tokio::test]
async fn test_activate_refuses_incomplete_graphs() {
    let app = common::build_test_app();
    let game = fixtures::draft_game("fresh");
    app.store.insert_game(game.clone());

    let (status, json) = common::post_empty(
        &app.router,
        &format!("/api/v1/admin/games/{}/activate", game.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "precondition_failed");
    assert_eq!(json["message"], "game has no nodes");
}

#[tokio::test]
async fn test_activate_then_complete_walks_the_lifecycle() {
    let app = common::build_test_app();
    let game = fixtures::draft_game("fresh");
    app.store.insert_game(game.clone());
    let mut start = fixtures::node(game.id, "s", 100);
    start.is_start = true;
    start.is_end = true;
    app.store.insert_node(start);

    let (status, json) = common::post_empty(
        &app.router,
        &format!("/api/v1/admin/games/{}/activate", game.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "active");

    let (status, json) = common::post_empty(
        &app.router,
        &format!("/api/v1/admin/games/{}/complete", game.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completed");

    // Terminal: a second completion is refused.
    let (status, _) = common::post_empty(
        &app.router,
        &format!("/api/v1/admin/games/{}/complete", game.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_game_is_404() {
    let app = common::build_test_app();

    let (status, json) = common::post_empty(
        &app.router,
        &format!("/api/v1/admin/games/{}/activate", uuid::Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game_not_found");
}
