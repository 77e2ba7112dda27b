//! Integration tests for pathprobe-inventory
//!
//! These tests run the client against an in-process NetBrain mock over
//! loopback HTTP.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pathprobe_core::{DeviceAttributes, GatewayCandidate, HaState, Inventory, InventoryError};
use pathprobe_inventory::testing::{MockNetBrain, TestServer, MOCK_TOKEN};
use pathprobe_inventory::types::CurrentDomainRequest;
use pathprobe_inventory::{NetBrainClient, NetBrainError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn firewall(name: &str, ha: bool) -> DeviceAttributes {
    DeviceAttributes {
        name: name.to_string(),
        management_ip: "192.0.2.10".to_string(),
        vendor: "Palo Alto Networks".to_string(),
        is_high_availability: ha,
    }
}

// =============================================================================
// Session setup
// =============================================================================

#[tokio::test]
async fn test_connect_selects_tenant_and_domain() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();

    let client = server.connect().await.unwrap();

    assert_eq!(client.tenant_id(), "tenant-1");
    assert_eq!(client.domain_id(), "domain-1");
    assert_eq!(
        mock.current_domain(),
        Some(CurrentDomainRequest {
            tenant_id: "tenant-1".into(),
            domain_id: "domain-1".into(),
        })
    );
    assert_eq!(
        mock.requests(),
        vec![
            "Session?".to_string(),
            "CMDB/Tenants?".to_string(),
            "CMDB/Domains?tenantid=tenant-1".to_string(),
            "Session/CurrentDomain?".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_bad_credentials_fail_login() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();

    let mut config = server.config();
    config.password = "wrong".into();

    let err = NetBrainClient::connect(&config).await.unwrap_err();
    assert!(matches!(err, NetBrainError::Authentication(_)), "{err:?}");
}

#[tokio::test]
async fn test_unknown_tenant() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();

    let mut config = server.config();
    config.tenant = "Acme".into();

    let err = NetBrainClient::connect(&config).await.unwrap_err();
    assert!(matches!(err, NetBrainError::TenantNotFound(ref t) if t == "Acme"));
}

#[tokio::test]
async fn test_unknown_domain() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();

    let mut config = server.config();
    config.domain = "Production".into();

    let err = NetBrainClient::connect(&config).await.unwrap_err();
    assert!(matches!(err, NetBrainError::DomainNotFound(ref d) if d == "Production"));
    assert!(mock.current_domain().is_none());
}

#[tokio::test]
async fn test_rejected_token() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();

    let client = NetBrainClient::with_token(&server.base_url(), "stale", &server.config()).unwrap();
    let err = client.list_tenants().await.unwrap_err();
    assert!(matches!(err, NetBrainError::Authentication(_)));

    let client =
        NetBrainClient::with_token(&server.base_url(), MOCK_TOKEN, &server.config()).unwrap();
    assert_eq!(client.list_tenants().await.unwrap().len(), 1);
}

// =============================================================================
// CMDB queries
// =============================================================================

#[tokio::test]
async fn test_gateway_list_preserves_order() {
    let mock = MockNetBrain::new().with_gateways(
        "10.1.1.10",
        &[
            r#"{"ip":"10.1.1.2","device":"fw-b/vsys1"}"#,
            r#"{"ip":"10.1.1.1","device":"fw-a/vsys1"}"#,
        ],
    );
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    let records = client.gateway_list("10.1.1.10").await.unwrap();
    let candidates: Vec<GatewayCandidate> = records
        .iter()
        .map(|r| GatewayCandidate::from_payload(&r.payload).unwrap())
        .collect();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].ip, "10.1.1.2");
    assert_eq!(candidates[0].device_ref(), Some("fw-b/vsys1"));
    assert_eq!(candidates[1].ip, "10.1.1.1");
    assert!(mock
        .requests()
        .contains(&"CMDB/Path/Gateways?ipOrHost=10.1.1.10".to_string()));
}

#[tokio::test]
async fn test_gateway_list_for_unknown_ip_is_empty() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    assert!(client.gateway_list("203.0.113.7").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_device_attributes() {
    let mock = MockNetBrain::new().with_device(firewall("fw-a", true));
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    let attrs = client.device_attributes("fw-a").await.unwrap();
    assert_eq!(attrs, firewall("fw-a", true));

    let err = client.device_attributes("ghost").await.unwrap_err();
    assert!(matches!(err, NetBrainError::NotFound(_)));
}

#[tokio::test]
async fn test_ha_state() {
    let mock = MockNetBrain::new()
        .with_ha_content("fw-a", "Group 1:\n  Local Information:\n    State: active\n")
        .with_ha_content("fw-b", "Group 1:\n  Local Information:\n    State: passive\n")
        .with_ha_content("fw-c", "HA not enabled");
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    assert_eq!(client.ha_state("fw-a").await.unwrap(), HaState::Active);
    assert_eq!(client.ha_state("fw-b").await.unwrap(), HaState::Passive);
    assert_eq!(client.ha_state("fw-c").await.unwrap(), HaState::Unknown);
    let lookup = "CMDB/Devices/DeviceRawData?dataType=1&hostname=fw-a&tableName=HA State";
    assert!(mock.requests().contains(&lookup.to_string()));
}

#[tokio::test]
async fn test_server_error_status() {
    let mock = MockNetBrain::new().fail("CMDB/Path/Gateways", StatusCode::INTERNAL_SERVER_ERROR);
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    match client.gateway_list("10.1.1.10").await.unwrap_err() {
        NetBrainError::ServerError { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("CMDB/Path/Gateways"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_envelope_on_gateway_list_is_a_parse_error() {
    let mock = MockNetBrain::new()
        .with_gateways("10.1.1.10", &[r#"{"ip":"10.1.1.1"}"#])
        .envelope("CMDB/Path/Gateways");
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    let err = client.gateway_list("10.1.1.10").await.unwrap_err();
    assert!(matches!(err, NetBrainError::ParseError(_)), "got {err:?}");

    let inventory: &dyn Inventory = &client;
    assert!(matches!(
        inventory.list_gateway_candidates("10.1.1.10").await.unwrap_err(),
        InventoryError::Parse(_)
    ));
}

#[tokio::test]
async fn test_error_envelope_on_raw_data_is_not_an_ha_state() {
    let mock = MockNetBrain::new()
        .with_ha_content("fw-a", "Group 1:\n  Local Information:\n    State: passive\n")
        .envelope("CMDB/Devices/DeviceRawData");
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    let err = client.ha_state("fw-a").await.unwrap_err();
    assert!(matches!(err, NetBrainError::ParseError(_)), "got {err:?}");

    let inventory: &dyn Inventory = &client;
    assert!(matches!(
        inventory.get_ha_state("fw-a").await.unwrap_err(),
        InventoryError::Parse(_)
    ));
}

#[tokio::test]
async fn test_envelope_from_bare_server_with_session_token() {
    // Any 200 body without the payload key, served without the mock's session flow
    let envelope = || async {
        Json(json!({ "statusCode": 791000, "statusDescription": "Null parameter." }))
    };
    let router = Router::new()
        .route("/ServicesAPI/API/V1/CMDB/Path/Gateways", get(envelope))
        .route("/ServicesAPI/API/V1/CMDB/Devices/DeviceRawData", get(envelope));
    let server = TestServer::start(router).await.unwrap();
    let client =
        NetBrainClient::with_token(&server.base_url(), MOCK_TOKEN, &server.config()).unwrap();

    assert!(matches!(
        client.gateway_list("10.1.1.10").await,
        Err(NetBrainError::ParseError(_))
    ));
    assert!(matches!(
        client.ha_state("fw-a").await,
        Err(NetBrainError::ParseError(_))
    ));
}

#[tokio::test]
async fn test_present_content_without_state_is_unknown() {
    let mock = MockNetBrain::new().with_ha_content("fw-a", "");
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();

    assert_eq!(client.ha_state("fw-a").await.unwrap(), HaState::Unknown);
}

// =============================================================================
// Inventory trait
// =============================================================================

#[tokio::test]
async fn test_inventory_trait_maps_errors() {
    let mock = MockNetBrain::new()
        .with_device(firewall("fw-a", false))
        .fail("CMDB/Devices/DeviceRawData", StatusCode::BAD_GATEWAY);
    let server = TestServer::mock(&mock).await.unwrap();
    let client = server.connect().await.unwrap();
    let inventory: &dyn Inventory = &client;

    assert_eq!(
        inventory.get_device_attributes("fw-a").await.unwrap().name,
        "fw-a"
    );
    assert!(matches!(
        inventory.get_device_attributes("ghost").await.unwrap_err(),
        InventoryError::NotFound(_)
    ));
    assert!(matches!(
        inventory.get_ha_state("fw-a").await.unwrap_err(),
        InventoryError::Server { status: 502, .. }
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let mock = MockNetBrain::new();
    let server = TestServer::mock(&mock).await.unwrap();
    let config = server.config();
    server.shutdown().await;

    let err: InventoryError = NetBrainClient::connect(&config).await.unwrap_err().into();
    assert!(matches!(err, InventoryError::Transport(_)));
}
