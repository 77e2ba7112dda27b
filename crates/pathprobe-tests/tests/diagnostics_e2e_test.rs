//! End-to-end tests for bidirectional path diagnostics
//!
//! The real NetBrain client talks to an in-process mock server over
//! loopback; device sessions use the scripted executor so no SSH
//! endpoint is required.
//!
//! Run with: cargo test -p pathprobe-tests --test diagnostics_e2e_test

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use pathprobe_core::{
    DeviceAttributes, DiagnosticError, Direction, DirectionOutcome, ExecutionError, TaskState,
};
use pathprobe_gateway::DiagnosticOrchestrator;
use pathprobe_inventory::testing::{MockNetBrain, TestServer};
use pathprobe_ssh::mock::MockExecutor;
use pretty_assertions::assert_eq;

const SRC: &str = "10.10.1.50";
const DST: &str = "10.20.1.60";

const ROUTER_MGMT: &str = "192.0.2.1";
const FIREWALL_MGMT: &str = "192.0.2.2";

fn device(name: &str, mgmt_ip: &str, vendor: &str, ha: bool) -> DeviceAttributes {
    DeviceAttributes {
        name: name.to_string(),
        management_ip: mgmt_ip.to_string(),
        vendor: vendor.to_string(),
        is_high_availability: ha,
    }
}

fn ha_table(state: &str) -> String {
    format!("Group 1:\n  Local Information:\n    State: {state} (last 41 days)\n")
}

/// Source side behind a Cisco router, destination side behind a PAN HA pair
/// whose first-listed member is passive
fn campus() -> MockNetBrain {
    MockNetBrain::new()
        .with_gateways(
            SRC,
            &[
                r#"{"ip":"10.10.1.254","type":"L3 switch SVI"}"#,
                r#"{"ip":"10.10.1.1","device":"rtr-a"}"#,
            ],
        )
        .with_gateways(
            DST,
            &[
                r#"{"ip":"10.20.1.2","device":"fw-b/vsys1"}"#,
                r#"{"ip":"10.20.1.1","device":"fw-a/vsys1"}"#,
            ],
        )
        .with_device(device("rtr-a", ROUTER_MGMT, "Cisco", false))
        .with_device(device("fw-a", FIREWALL_MGMT, "Palo Alto Networks", true))
        .with_device(device("fw-b", "192.0.2.3", "Palo Alto Networks", true))
        .with_ha_content("fw-a", &ha_table("active"))
        .with_ha_content("fw-b", &ha_table("passive"))
}

async fn orchestrator(server: &TestServer, exec: &MockExecutor) -> DiagnosticOrchestrator {
    let client = server.connect().await.unwrap();
    DiagnosticOrchestrator::new(Arc::new(client), Arc::new(exec.clone()))
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test]
async fn test_trace_both_directions() {
    let mock = campus();
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new()
        .with_response("ping 10.20.1.60 source 10.10.1.1", "Success rate is 100 percent (5/5)")
        .with_response(
            "traceroute source 10.20.1.1 host 10.10.1.50",
            " 1  10.20.1.1  0.4 ms\n 2  10.10.1.50  1.9 ms",
        );

    let report = orchestrator(&server, &exec)
        .await
        .run(SRC, DST, &Direction::BOTH)
        .await
        .unwrap();

    assert_eq!(report.len(), 2);
    assert!(report.failed().is_empty());

    let forward = report.get(Direction::Forward).and_then(|o| o.outputs()).unwrap();
    assert_eq!(forward["ping_dst"], "Success rate is 100 percent (5/5)");
    assert_eq!(forward["ping_src"], "ping 10.10.1.50 source 10.10.1.1: ok");

    let reverse = report.get(Direction::Reverse).and_then(|o| o.outputs()).unwrap();
    let labels: Vec<&str> = reverse.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["ping_src", "ping_dst", "traceroute"]);
    assert!(reverse["traceroute"].contains("10.10.1.50"));

    // Per host, commands run in label order on one session
    let on_firewall: Vec<String> = exec
        .executed()
        .into_iter()
        .filter(|(host, _)| host == FIREWALL_MGMT)
        .map(|(_, cmd)| cmd)
        .collect();
    assert_eq!(
        on_firewall,
        vec![
            "ping count 4 source 10.20.1.1 host 10.20.1.60".to_string(),
            "ping count 4 source 10.20.1.1 host 10.10.1.50".to_string(),
            "traceroute source 10.20.1.1 host 10.10.1.50".to_string(),
        ]
    );
    assert!(exec.executed().iter().all(|(host, _)| host != "192.0.2.3"));
}

#[tokio::test]
async fn test_report_json_shape() {
    let mock = campus();
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new();

    let report = orchestrator(&server, &exec)
        .await
        .run(SRC, DST, &[Direction::Forward])
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "forward": {
                "ping_src": "ping 10.10.1.50 source 10.10.1.1: ok",
                "ping_dst": "ping 10.20.1.60 source 10.10.1.1: ok",
                "traceroute": "traceroute 10.20.1.60 source 10.10.1.1: ok",
            }
        })
    );
}

#[tokio::test]
async fn test_resolution_queries_stop_at_winner() {
    let mock = campus();
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new();

    let gateway = orchestrator(&server, &exec)
        .await
        .resolver()
        .resolve(DST)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(gateway.name, "fw-a");
    assert_eq!(gateway.source_ip, "10.20.1.1");

    let lookups: Vec<String> = mock
        .requests()
        .into_iter()
        .filter(|r| r.starts_with("CMDB/Devices"))
        .collect();
    assert_eq!(
        lookups,
        vec![
            "CMDB/Devices/Attributes?hostname=fw-b".to_string(),
            "CMDB/Devices/DeviceRawData?dataType=1&hostname=fw-b&tableName=HA State".to_string(),
            "CMDB/Devices/Attributes?hostname=fw-a".to_string(),
            "CMDB/Devices/DeviceRawData?dataType=1&hostname=fw-a&tableName=HA State".to_string(),
        ]
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_partial_failure_when_one_side_has_no_gateway() {
    // Destination subnet only has an unmanaged gateway
    let mock = campus().with_gateways(DST, &[r#"{"ip":"10.20.1.254"}"#]);
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new();

    let report = orchestrator(&server, &exec)
        .await
        .run(SRC, DST, &Direction::BOTH)
        .await
        .unwrap();

    assert!(report.is_partial());
    assert_eq!(report.succeeded(), vec![Direction::Forward]);
    assert_eq!(
        report.get(Direction::Reverse),
        Some(&DirectionOutcome::Failed {
            error: format!("No active gateway found for {}", DST),
            state: TaskState::ResolutionFailed,
        })
    );
}

#[tokio::test]
async fn test_execution_failure_is_isolated() {
    let mock = campus();
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new().fail_open(
        ROUTER_MGMT,
        ExecutionError::Authentication {
            host: ROUTER_MGMT.into(),
            reason: "permission denied".into(),
        },
    );

    let report = orchestrator(&server, &exec)
        .await
        .run(SRC, DST, &Direction::BOTH)
        .await
        .unwrap();

    let forward = report.get(Direction::Forward).unwrap();
    assert!(forward.error().unwrap().contains("permission denied"));
    assert!(matches!(
        forward,
        DirectionOutcome::Failed {
            state: TaskState::ExecutionFailed,
            ..
        }
    ));
    assert!(report.get(Direction::Reverse).unwrap().is_completed());
}

#[tokio::test]
async fn test_inventory_outage_fails_every_direction() {
    let mock = campus().fail("CMDB/Path/Gateways", StatusCode::SERVICE_UNAVAILABLE);
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new();

    let err = orchestrator(&server, &exec)
        .await
        .run(SRC, DST, &Direction::BOTH)
        .await
        .unwrap_err();

    match err {
        DiagnosticError::Aggregate(agg) => {
            let mut directions = agg.directions();
            directions.sort();
            assert_eq!(directions, vec![Direction::Forward, Direction::Reverse]);
            assert!(agg.failures.iter().all(|(_, reason)| reason.contains("503")));
            assert!(agg.to_string().contains("forward"));
            assert!(agg.to_string().contains("reverse"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(exec.executed().is_empty());
}

#[tokio::test]
async fn test_gateway_error_envelope_is_not_a_missing_gateway() {
    let mock = campus().envelope("CMDB/Path/Gateways");
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new();
    let orch = orchestrator(&server, &exec).await;

    assert!(orch.resolver().resolve(SRC).await.is_err());

    match orch.run(SRC, DST, &Direction::BOTH).await.unwrap_err() {
        DiagnosticError::Aggregate(agg) => {
            assert_eq!(agg.failures.len(), 2);
            assert!(agg
                .failures
                .iter()
                .all(|(_, reason)| !reason.contains("No active gateway")));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(exec.executed().is_empty());
}

#[tokio::test]
async fn test_ha_error_envelope_never_selects_passive_peer() {
    let mock = campus().envelope("CMDB/Devices/DeviceRawData");
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new();

    let result = orchestrator(&server, &exec).await.resolver().resolve(DST).await;

    assert!(result.is_err(), "resolved {result:?}");
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_shutdown_abandons_running_directions() {
    let mock = campus();
    let server = TestServer::mock(&mock).await.unwrap();
    let exec = MockExecutor::new()
        .with_open_delay(ROUTER_MGMT, Duration::from_secs(30))
        .with_open_delay(FIREWALL_MGMT, Duration::from_secs(30));
    let orch = orchestrator(&server, &exec).await;

    let started = Instant::now();
    let result = orch
        .run_until(
            SRC,
            DST,
            &Direction::BOTH,
            tokio::time::sleep(Duration::from_millis(200)),
        )
        .await;

    assert!(matches!(result, Err(DiagnosticError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(exec.executed().is_empty());
}
