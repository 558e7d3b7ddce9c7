#![allow(clippy::unwrap_used)]
// End-to-end tests for `Mower`, `IdentifierResolver`, `DeviceQuery`, and
// `CommandDispatcher` against a wiremock provider.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gardena_api::{Credentials, GardenaClient};
use gardena_core::{CoreError, IdentifierStrategy, MowerState, Mower, MowerConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn static_ids(location: Option<&str>, mower: Option<&str>) -> IdentifierStrategy {
    IdentifierStrategy::Static {
        location_id: location.map(str::to_owned),
        mower_id: mower.map(str::to_owned),
    }
}

async fn setup(identifiers: IdentifierStrategy) -> (MockServer, Mower) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/v1/", server.uri())).unwrap();
    let config = MowerConfig::new("me@example.com", "pw".to_string().into(), identifiers)
        .with_base_url(base_url.clone());
    let credentials = Credentials::new("me@example.com", "pw".to_string().into());
    let client = GardenaClient::with_client(reqwest::Client::new(), base_url, credentials);
    (server, Mower::with_client(config, client))
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "tok-1",
                "attributes": { "expires_in": 3600, "provider": "husqvarna", "user_id": "u1" }
            }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn mower_devices(status: &str, level: u8, charging: bool) -> serde_json::Value {
    json!({
        "devices": [
            { "id": "GW", "category": "gateway", "abilities": [] },
            {
                "id": "M1",
                "category": "mower",
                "abilities": [
                    {
                        "type": "robotic_mower",
                        "properties": [{ "name": "status", "value": status }]
                    },
                    {
                        "type": "battery_power",
                        "properties": [
                            { "name": "level", "value": level },
                            { "name": "charging", "value": charging }
                        ]
                    }
                ]
            }
        ]
    })
}

async fn mount_devices(server: &MockServer, location: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .and(query_param("locationId", location))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Identifier resolution ───────────────────────────────────────────

#[tokio::test]
async fn test_static_ids_need_no_network() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;

    let ids = mower.identifiers();
    assert_eq!(ids.location_id(mower.client()).await.unwrap(), "L1");
    assert_eq!(ids.mower_id(mower.client()).await.unwrap(), "M1");

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_static_mode_missing_mower_id_is_config_error() {
    let (server, mower) = setup(static_ids(Some("L1"), None)).await;

    let result = mower.identifiers().mower_id(mower.client()).await;
    assert!(
        matches!(result, Err(CoreError::Config { .. })),
        "expected Config error, got: {result:?}"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_discovered_location_is_first_entry_and_cached() {
    let (server, mower) = setup(IdentifierStrategy::Discover).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .and(query_param("user_id", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [{ "id": "L9" }, { "id": "L2" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = mower.identifiers();
    assert_eq!(ids.location_id(mower.client()).await.unwrap(), "L9");
    assert_eq!(ids.location_id(mower.client()).await.unwrap(), "L9");
}

#[tokio::test]
async fn test_discovered_mower_is_first_mower_device() {
    let (server, mower) = setup(IdentifierStrategy::Discover).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [{ "id": "L9" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .and(query_param("locationId", "L9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mower_devices("paused", 80, false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ids = mower.identifiers();
    assert_eq!(ids.mower_id(mower.client()).await.unwrap(), "M1");
    assert_eq!(ids.mower_id(mower.client()).await.unwrap(), "M1");
}

#[tokio::test]
async fn test_no_locations_is_resolution_error() {
    let (server, mower) = setup(IdentifierStrategy::Discover).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "locations": [] })))
        .mount(&server)
        .await;

    match mower.identifiers().location_id(mower.client()).await {
        Err(CoreError::Resolution { identifier, .. }) => assert_eq!(identifier, "location id"),
        other => panic!("expected Resolution error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_location_without_mower_is_resolution_error() {
    let (server, mower) = setup(IdentifierStrategy::Discover).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [{ "id": "L9" }]
        })))
        .mount(&server)
        .await;
    mount_devices(
        &server,
        "L9",
        json!({ "devices": [{ "id": "GW", "category": "gateway" }] }),
    )
    .await;

    match mower.identifiers().mower_id(mower.client()).await {
        Err(CoreError::Resolution { identifier, .. }) => assert_eq!(identifier, "mower id"),
        other => panic!("expected Resolution error, got: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_is_single_flight() {
    let (server, mower) = setup(IdentifierStrategy::Discover).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "locations": [{ "id": "L9" }] }))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lookups = (0..6).map(|_| {
        let mower = mower.clone();
        async move { mower.identifiers().location_id(mower.client()).await }
    });
    for id in futures_util::future::join_all(lookups).await {
        assert_eq!(id.unwrap(), "L9");
    }
}

// ── Characteristics ─────────────────────────────────────────────────

#[tokio::test]
async fn test_cutting_mower_with_low_battery() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;
    mount_devices(&server, "L1", mower_devices("ok_cutting", 15, false)).await;

    assert_eq!(mower.mowing_characteristic().await.unwrap(), 1);
    assert_eq!(mower.battery_level_characteristic().await.unwrap(), Some(15));
    assert_eq!(mower.low_battery_characteristic().await.unwrap(), Some(1));
    assert_eq!(mower.charging_state_characteristic().await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_charging_mower_reads_not_mowing() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;
    mount_devices(&server, "L1", mower_devices("ok_charging", 64, true)).await;

    assert_eq!(
        mower.state().await.unwrap(),
        MowerState {
            status: Some("ok_charging".into()),
            battery_level: Some(64),
            charging: Some(true),
        }
    );
    assert_eq!(mower.mowing_characteristic().await.unwrap(), 0);
    assert_eq!(mower.low_battery_characteristic().await.unwrap(), Some(0));
    assert_eq!(mower.charging_state_characteristic().await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_missing_properties_are_absent_not_errors() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;
    mount_devices(
        &server,
        "L1",
        json!({ "devices": [{ "id": "M1", "category": "mower", "abilities": [] }] }),
    )
    .await;

    assert_eq!(mower.mowing_characteristic().await.unwrap(), 0);
    assert_eq!(mower.battery_level_characteristic().await.unwrap(), None);
    assert_eq!(mower.low_battery_characteristic().await.unwrap(), None);
    assert_eq!(mower.charging_state_characteristic().await.unwrap(), None);
}

#[tokio::test]
async fn test_configured_mower_is_read_among_several() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M2"))).await;
    mount_token(&server, 1).await;
    mount_devices(
        &server,
        "L1",
        json!({
            "devices": [
                {
                    "id": "M1",
                    "category": "mower",
                    "abilities": [
                        { "type": "robotic_mower",
                          "properties": [{ "name": "status", "value": "ok_cutting" }] },
                        { "type": "battery_power",
                          "properties": [{ "name": "level", "value": 80 }] }
                    ]
                },
                {
                    "id": "M2",
                    "category": "mower",
                    "abilities": [
                        { "type": "robotic_mower",
                          "properties": [{ "name": "status", "value": "parked_timer" }] },
                        { "type": "battery_power",
                          "properties": [{ "name": "level", "value": 12 }] }
                    ]
                }
            ]
        }),
    )
    .await;

    assert_eq!(mower.mowing_characteristic().await.unwrap(), 0);
    assert_eq!(mower.battery_level_characteristic().await.unwrap(), Some(12));
    assert_eq!(mower.low_battery_characteristic().await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_null_and_nameless_entries_do_not_break_reads() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;
    mount_devices(
        &server,
        "L1",
        json!({
            "devices": [
                {
                    "id": "GW",
                    "category": "gateway",
                    "abilities": [{ "type": "radio_link", "properties": [{ "value": 3 }] }]
                },
                { "id": "S1", "category": null, "abilities": null },
                {
                    "id": "M1",
                    "category": "mower",
                    "abilities": [{
                        "type": "battery_power",
                        "properties": [{ "name": "level", "value": 15 }]
                    }]
                }
            ]
        }),
    )
    .await;

    assert_eq!(mower.battery_level_characteristic().await.unwrap(), Some(15));
    assert_eq!(mower.mowing_characteristic().await.unwrap(), 0);
}

#[tokio::test]
async fn test_device_listing_failure_is_query_error() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = mower.battery_level_characteristic().await;
    match result {
        Err(ref err @ CoreError::Query { .. }) => assert_eq!(err.status(), Some(503)),
        other => panic!("expected Query error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure_is_reported_and_not_cached() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/token"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad credentials"))
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let result = mower.mowing_characteristic().await;
        assert!(
            matches!(result, Err(CoreError::Auth { .. })),
            "expected Auth error, got: {result:?}"
        );
    }
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_on_starts_override_timer() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/devices/M1/abilities/mower/command"))
        .and(query_param("locationId", "L1"))
        .and(body_json(json!({
            "name": "start_override_timer",
            "parameters": { "duration": 180 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accepted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = mower.set_mower_on(true).await.unwrap();
    assert_eq!(ack.status, 200);
    assert_eq!(ack.payload, Some(json!({ "accepted": true })));
}

#[tokio::test]
async fn test_switch_off_parks_without_parameters() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/devices/M1/abilities/mower/command"))
        .and(query_param("locationId", "L1"))
        .and(body_json(json!({ "name": "park_until_next_timer" })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    mower.set_mower_on(false).await.unwrap();
}

#[tokio::test]
async fn test_named_command_posts_name_and_parameters() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/devices/M1/abilities/mower/command"))
        .and(query_param("locationId", "L1"))
        .and(body_json(json!({
            "name": "start_seconds_to_override",
            "parameters": { "seconds": 60 }
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let mut parameters = serde_json::Map::new();
    parameters.insert("seconds".into(), json!(60));
    let ack = mower
        .commands()
        .send_named("start_seconds_to_override", Some(parameters))
        .await
        .unwrap();
    assert_eq!(ack.status, 202);
    assert_eq!(ack.payload, None);
}

#[tokio::test]
async fn test_command_without_mower_id_is_command_error() {
    let (server, mower) = setup(static_ids(Some("L1"), None)).await;

    match mower.set_mower_on(true).await {
        Err(CoreError::Command {
            command, message, ..
        }) => {
            assert_eq!(command, "start_override_timer");
            assert!(message.contains("mower-id"), "got: {message}");
        }
        other => panic!("expected Command error, got: {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_command_is_not_retried() {
    let (server, mower) = setup(static_ids(Some("L1"), Some("M1"))).await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/devices/M1/abilities/mower/command"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = mower.set_mower_on(false).await;
    assert!(matches!(
        result,
        Err(CoreError::Command {
            status: Some(500),
            ..
        })
    ));
}

#[tokio::test]
async fn test_stale_discovered_ids_are_resolved_again() {
    let (server, mower) = setup(IdentifierStrategy::Discover).await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [{ "id": "L9" }]
        })))
        .expect(2)
        .mount(&server)
        .await;
    mount_devices(&server, "L9", mower_devices("parked_timer", 90, false)).await;
    Mock::given(method("POST"))
        .and(path("/v1/devices/M1/abilities/mower/command"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = mower.set_mower_on(true).await;
    assert!(result.as_ref().is_err_and(CoreError::is_not_found), "got: {result:?}");

    // Identifiers were cleared, so the next read looks the location up again.
    mower.state().await.unwrap();
}
