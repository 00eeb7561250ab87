//! End-to-end smoke tests for the full casitad stack.
//!
//! Each test spins up the complete application (real JSON snapshot file in a
//! temp directory, real service, real axum router) and exercises the HTTP
//! layer via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use casita_adapter_http_axum::router;
use casita_adapter_http_axum::state::AppState;
use casita_adapter_storage_json::JsonSnapshotStore;
use casita_app::services::RegistryService;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a fully-wired router over the given snapshot file, seeding the
/// initial layout exactly as `casitad` does at startup.
async fn app(snapshot: &Path) -> axum::Router {
    let store = JsonSnapshotStore::new(snapshot);
    let service = RegistryService::new(store);
    service
        .ensure_seeded()
        .await
        .expect("seeding should succeed");
    router::build(AppState::new(service))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health check and seed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let dir = tempfile::tempdir().unwrap();
    let resp = app(&dir.path().join("data.json"))
        .await
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_seed_living_room_on_first_start() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    let resp = app.clone().oneshot(get("/api/status")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let status = body_json(resp).await;
    assert_eq!(status["total_rooms"], 1);
    assert_eq!(status["total_devices"], 2);

    let resp = app.oneshot(get("/api/rooms/living")).await.unwrap();
    let room = body_json(resp).await;
    assert_eq!(room["light_count"], 1);
    assert_eq!(room["thermostat_count"], 1);
    assert_eq!(room["devices"][1]["state"], 21);
}

// ---------------------------------------------------------------------------
// Room lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_rename_and_delete_room() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    let resp = app
        .clone()
        .oneshot(json("POST", "/api/rooms", r#"{"kind":"dormitorio"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["name"], "dormitorio");

    let resp = app
        .clone()
        .oneshot(json(
            "PUT",
            "/api/rooms/dormitorio",
            r#"{"new_name":"suite"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["name"], "suite");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/rooms/suite")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.oneshot(get("/api/rooms/suite")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_refuse_to_delete_room_holding_devices() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/rooms/living")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("light-01"));
    assert!(message.contains("thermo-01"));
}

#[tokio::test]
async fn should_cap_the_home_at_six_rooms() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    // The seed already created one room.
    for _ in 0..5 {
        let resp = app
            .clone()
            .oneshot(json("POST", "/api/rooms", r#"{"kind":"dormitorio"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let resp = app
        .oneshot(json("POST", "/api/rooms", r#"{"kind":"comedor"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Device lifecycle and actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_oven_workflow_in_kitchen() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    app.clone()
        .oneshot(json("POST", "/api/rooms", r#"{"kind":"cocina"}"#))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices",
            r#"{"room":"cocina","type":"oven"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let oven = body_json(resp).await;
    assert_eq!(oven["id"], "oven-01");
    assert_eq!(oven["state"]["temperature"], 180);
    assert_eq!(oven["state"]["active"], false);

    let resp = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices/oven-01/actions",
            r#"{"action":"set_oven","temperature":220,"active":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let oven = body_json(resp).await;
    assert_eq!(oven["state"]["temperature"], 220);
    assert_eq!(oven["state"]["active"], true);

    let resp = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices/oven-01/actions",
            r#"{"action":"set_oven_timer","minutes":999}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The failed patch changed nothing.
    let resp = app
        .oneshot(get("/api/devices/oven-01"))
        .await
        .unwrap();
    let oven = body_json(resp).await;
    assert_eq!(oven["state"]["temperature"], 220);
    assert_eq!(oven["state"]["timer"], 0);
}

#[tokio::test]
async fn should_toggle_and_move_devices() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    app.clone()
        .oneshot(json("POST", "/api/rooms", r#"{"kind":"dormitorio"}"#))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices/light-01/actions",
            r#"{"action":"toggle_light"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["state"], true);

    let resp = app
        .clone()
        .oneshot(json(
            "PUT",
            "/api/devices/light-01",
            r#"{"room":"dormitorio"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let light = body_json(resp).await;
    assert_eq!(light["room"], "dormitorio");
    assert_eq!(light["state"], true);

    let resp = app
        .clone()
        .oneshot(get("/api/devices?room=dormitorio"))
        .await
        .unwrap();
    let listed = body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/devices/light-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn should_map_domain_errors_to_status_codes() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir.path().join("data.json")).await;

    let resp = app
        .clone()
        .oneshot(get("/api/devices/fan-99"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices",
            r#"{"room":"living","type":"dishwasher"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Ovens only belong in kitchens.
    let resp = app
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices",
            r#"{"room":"living","type":"oven"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Thermostat actions against a light.
    let resp = app
        .oneshot(json(
            "POST",
            "/api/devices/light-01/actions",
            r#"{"action":"set_thermostat","temperature":24}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Snapshot persistence across instances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_share_snapshot_between_instances() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("data.json");

    let first = app(&snapshot).await;
    first
        .clone()
        .oneshot(json("POST", "/api/rooms", r#"{"kind":"cocina"}"#))
        .await
        .unwrap();
    first
        .oneshot(json(
            "POST",
            "/api/devices",
            r#"{"room":"cocina","type":"fan","initial_state":3}"#,
        ))
        .await
        .unwrap();

    // A second instance over the same file sees everything, including
    // in-flight changes made after its startup.
    let second = app(&snapshot).await;
    let resp = second
        .clone()
        .oneshot(get("/api/devices/fan-01"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fan = body_json(resp).await;
    assert_eq!(fan["room"], "cocina");
    assert_eq!(fan["state"], 3);

    second
        .clone()
        .oneshot(json(
            "POST",
            "/api/devices/fan-01/actions",
            r#"{"action":"turn_fan_off"}"#,
        ))
        .await
        .unwrap();

    let resp = second.oneshot(get("/api/status")).await.unwrap();
    let status = body_json(resp).await;
    assert_eq!(status["total_rooms"], 2);
    assert_eq!(status["total_devices"], 3);
}
