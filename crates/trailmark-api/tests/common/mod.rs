//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use trailmark_api::routes;
use trailmark_api::state::AppState;
use trailmark_core::clock::Clock;
use trailmark_core::model::{Game, Node, Team};
use trailmark_core::password;
use trailmark_core::repository::{
    GameRepository, GraphRepository, HintRepository, ScanRepository, SessionRepository,
    TeamRepository,
};
use trailmark_core::rng::DeterministicRng;
use trailmark_test_support::{FixedClock, MemoryStore, SequenceRng, fixtures};

/// A fully wired app over the in-memory store and a pinned clock.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub router: Router,
}

/// Build the full app router with in-memory repositories and a
/// deterministic clock/RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(fixtures::t0()));
    let rng: Arc<Mutex<dyn DeterministicRng>> =
        Arc::new(Mutex::new(SequenceRng::new(vec![1, 7, 13, 29, 3])));
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn GameRepository>,
        Arc::clone(&store) as Arc<dyn GraphRepository>,
        Arc::clone(&store) as Arc<dyn TeamRepository>,
        Arc::clone(&store) as Arc<dyn ScanRepository>,
        Arc::clone(&store) as Arc<dyn HintRepository>,
        Arc::clone(&store) as Arc<dyn SessionRepository>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        rng,
    );
    let router = routes::app(state);
    TestApp {
        store,
        clock,
        router,
    }
}

/// The seeded demo hunt: S (start, password "ADVENTURE", 100) -> B (150)
/// -> C (150) -> D (end, 300), with team Alpha assigned to S.
pub struct DemoHunt {
    pub game: Game,
    pub start: Node,
    pub team: Team,
}

impl TestApp {
    pub fn seed_demo_hunt(&self) -> DemoHunt {
        let game = fixtures::active_game("demo");
        self.store.insert_game(game.clone());

        let mut start = fixtures::node(game.id, "s", 100);
        start.is_start = true;
        start.password_hash = Some(password::digest("ADVENTURE"));
        let mut b = fixtures::node(game.id, "b", 150);
        b.sort_order = 1;
        let mut c = fixtures::node(game.id, "c", 150);
        c.sort_order = 2;
        c.hint = Some("Look under the bridge".to_owned());
        let mut d = fixtures::node(game.id, "d", 300);
        d.sort_order = 3;
        d.is_end = true;
        for node in [&start, &b, &c, &d] {
            self.store.insert_node(node.clone());
        }
        self.store
            .insert_edge(fixtures::edge(game.id, start.id, b.id, 0));
        self.store.insert_edge(fixtures::edge(game.id, b.id, c.id, 0));
        self.store.insert_edge(fixtures::edge(game.id, c.id, d.id, 0));

        let mut team = fixtures::team(game.id, "ALPHA", "Alpha");
        team.start_node_id = Some(start.id);
        self.store.insert_team(team.clone());

        DemoHunt { game, start, team }
    }

    /// Joins via the HTTP surface and returns the bearer token.
    pub async fn join(&self, slug: &str, code: &str) -> String {
        let (status, json) = post_json(
            &self.router,
            "/api/v1/sessions/join",
            None,
            &serde_json::json!({ "game_slug": slug, "team_code": code }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "join failed: {json}");
        json["token"].as_str().unwrap().to_owned()
    }
}

fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    router: &Router,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(router, request("POST", uri, token, Some(body))).await
}

/// Send a bodyless POST request and return the response.
pub async fn post_empty(
    router: &Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    send(router, request("POST", uri, token, None)).await
}

/// Send a GET request and return the response.
pub async fn get_json(
    router: &Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    send(router, request("GET", uri, token, None)).await
}
