//! Test utilities for pathprobe-inventory
//!
//! [`MockNetBrain`] is an in-process NetBrain stand-in serving the subset of
//! the REST API the client uses; [`TestServer`] runs any axum router on a
//! loopback port and hands out clients pointed at it.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use parking_lot::RwLock;
use pathprobe_core::DeviceAttributes;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::types::{CurrentDomainRequest, Domain, Tenant};
use crate::{InventoryConfig, NetBrainClient, Result};

pub const MOCK_USERNAME: &str = "netops";
pub const MOCK_PASSWORD: &str = "s3cret";
pub const MOCK_TOKEN: &str = "mock-session-token";
pub const MOCK_TENANT: &str = "Default";
pub const MOCK_DOMAIN: &str = "Lab";

const PREFIX: &str = "/ServicesAPI/API/V1";

struct MockState {
    tenants: Vec<Tenant>,
    domains: HashMap<String, Vec<Domain>>,
    gateways: HashMap<String, Vec<String>>,
    devices: HashMap<String, DeviceAttributes>,
    ha_content: HashMap<String, String>,
    failures: HashMap<&'static str, StatusCode>,
    envelopes: HashSet<&'static str>,
    current_domain: Option<CurrentDomainRequest>,
    requests: Vec<String>,
}

/// Scripted NetBrain server; clones share state
#[derive(Clone)]
pub struct MockNetBrain {
    state: Arc<RwLock<MockState>>,
}

impl Default for MockNetBrain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetBrain {
    /// One tenant ([`MOCK_TENANT`]) with one domain ([`MOCK_DOMAIN`])
    pub fn new() -> Self {
        let mut domains = HashMap::new();
        domains.insert(
            "tenant-1".to_string(),
            vec![
                Domain {
                    domain_id: "domain-0".into(),
                    domain_name: "Staging".into(),
                },
                Domain {
                    domain_id: "domain-1".into(),
                    domain_name: MOCK_DOMAIN.into(),
                },
            ],
        );

        Self {
            state: Arc::new(RwLock::new(MockState {
                tenants: vec![Tenant {
                    tenant_id: "tenant-1".into(),
                    tenant_name: MOCK_TENANT.into(),
                }],
                domains,
                gateways: HashMap::new(),
                devices: HashMap::new(),
                ha_content: HashMap::new(),
                failures: HashMap::new(),
                envelopes: HashSet::new(),
                current_domain: None,
                requests: Vec::new(),
            })),
        }
    }

    /// Gateway payloads listed for `ip_or_host`, in order
    pub fn with_gateways(self, ip_or_host: &str, payloads: &[&str]) -> Self {
        self.state.write().gateways.insert(
            ip_or_host.to_string(),
            payloads.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn with_device(self, attrs: DeviceAttributes) -> Self {
        self.state.write().devices.insert(attrs.name.clone(), attrs);
        self
    }

    /// Raw `HA State` table text for a device
    pub fn with_ha_content(self, device: &str, content: &str) -> Self {
        self.state
            .write()
            .ha_content
            .insert(device.to_string(), content.to_string());
        self
    }

    /// Answer every request to `path` (below the API prefix) with `status`
    pub fn fail(self, path: &'static str, status: StatusCode) -> Self {
        self.state.write().failures.insert(path, status);
        self
    }

    /// Answer every request to `path` with HTTP 200 carrying only NetBrain's
    /// status envelope, as the server does for rejected parameters
    pub fn envelope(self, path: &'static str) -> Self {
        self.state.write().envelopes.insert(path);
        self
    }

    /// Domain selected through `PUT /Session/CurrentDomain`
    pub fn current_domain(&self) -> Option<CurrentDomainRequest> {
        self.state.read().current_domain.clone()
    }

    /// `"<path>?<query>"` of every request, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.state.read().requests.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(&format!("{PREFIX}/Session"), get(login))
            .route(&format!("{PREFIX}/Session/CurrentDomain"), put(set_current_domain))
            .route(&format!("{PREFIX}/CMDB/Tenants"), get(tenants))
            .route(&format!("{PREFIX}/CMDB/Domains"), get(domains))
            .route(&format!("{PREFIX}/CMDB/Path/Gateways"), get(gateways))
            .route(&format!("{PREFIX}/CMDB/Devices/Attributes"), get(attributes))
            .route(&format!("{PREFIX}/CMDB/Devices/DeviceRawData"), get(raw_data))
            .with_state(self.clone())
    }

    fn record(&self, path: &'static str, query: &HashMap<String, String>) {
        let mut pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.sort();
        self.state
            .write()
            .requests
            .push(format!("{}?{}", path, pairs.join("&")));
    }

    /// Token check plus injected failures
    fn guard(
        &self,
        path: &'static str,
        headers: &HeaderMap,
    ) -> std::result::Result<(), ApiError> {
        if let Some(status) = self.state.read().failures.get(path) {
            return Err(ApiError(*status, format!("injected failure on {path}")));
        }
        if self.state.read().envelopes.contains(path) {
            return Err(ApiError(StatusCode::OK, "Null parameter.".into()));
        }
        match headers.get("Token").and_then(|v| v.to_str().ok()) {
            Some(MOCK_TOKEN) => Ok(()),
            _ => Err(ApiError(StatusCode::UNAUTHORIZED, "invalid token".into())),
        }
    }
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // NetBrain uses its own code space inside 200 envelopes
        let code = match self.0 {
            StatusCode::OK => 791000,
            status => u32::from(status.as_u16()),
        };
        let body = json!({
            "statusCode": code,
            "statusDescription": self.1,
        });
        (self.0, Json(body)).into_response()
    }
}

type Reply = std::result::Result<Json<Value>, ApiError>;

async fn login(State(mock): State<MockNetBrain>, Json(body): Json<Value>) -> Reply {
    mock.record("Session", &HashMap::new());
    if let Some(status) = mock.state.read().failures.get("Session") {
        return Err(ApiError(*status, "injected failure on Session".into()));
    }

    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if username == Some(MOCK_USERNAME) && password == Some(MOCK_PASSWORD) {
        Ok(Json(json!({ "token": MOCK_TOKEN })))
    } else {
        Err(ApiError(StatusCode::UNAUTHORIZED, "invalid credentials".into()))
    }
}

async fn tenants(State(mock): State<MockNetBrain>, headers: HeaderMap) -> Reply {
    mock.record("CMDB/Tenants", &HashMap::new());
    mock.guard("CMDB/Tenants", &headers)?;
    Ok(Json(json!({ "tenants": mock.state.read().tenants })))
}

async fn domains(
    State(mock): State<MockNetBrain>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    mock.record("CMDB/Domains", &query);
    mock.guard("CMDB/Domains", &headers)?;
    let tenant = query.get("tenantid").cloned().unwrap_or_default();
    let domains = mock
        .state
        .read()
        .domains
        .get(&tenant)
        .cloned()
        .unwrap_or_default();
    Ok(Json(json!({ "domains": domains })))
}

async fn set_current_domain(
    State(mock): State<MockNetBrain>,
    headers: HeaderMap,
    Json(body): Json<CurrentDomainRequest>,
) -> Reply {
    mock.record("Session/CurrentDomain", &HashMap::new());
    mock.guard("Session/CurrentDomain", &headers)?;
    mock.state.write().current_domain = Some(body);
    Ok(Json(json!({ "statusCode": 790200, "statusDescription": "Success." })))
}

async fn gateways(
    State(mock): State<MockNetBrain>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    mock.record("CMDB/Path/Gateways", &query);
    mock.guard("CMDB/Path/Gateways", &headers)?;
    let ip = query.get("ipOrHost").cloned().unwrap_or_default();
    let list: Vec<Value> = mock
        .state
        .read()
        .gateways
        .get(&ip)
        .map(|payloads| {
            payloads
                .iter()
                .map(|p| json!({ "gatewayName": ip, "type": "Device Interface", "payload": p }))
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(json!({ "gatewayList": list })))
}

async fn attributes(
    State(mock): State<MockNetBrain>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    mock.record("CMDB/Devices/Attributes", &query);
    mock.guard("CMDB/Devices/Attributes", &headers)?;
    let hostname = query.get("hostname").cloned().unwrap_or_default();
    let attrs = mock.state.read().devices.get(&hostname).cloned();
    Ok(Json(json!({ "hostname": hostname, "attributes": attrs })))
}

async fn raw_data(
    State(mock): State<MockNetBrain>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    mock.record("CMDB/Devices/DeviceRawData", &query);
    mock.guard("CMDB/Devices/DeviceRawData", &headers)?;
    if query.get("tableName").map(String::as_str) != Some("HA State") {
        return Err(ApiError(StatusCode::BAD_REQUEST, "unknown table".into()));
    }
    let hostname = query.get("hostname").cloned().unwrap_or_default();
    let content = mock
        .state
        .read()
        .ha_content
        .get(&hostname)
        .cloned()
        .unwrap_or_default();
    Ok(Json(json!({ "content": content })))
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve a [`MockNetBrain`]
    pub async fn mock(mock: &MockNetBrain) -> std::io::Result<Self> {
        Self::start(mock.router()).await
    }

    /// Serve an axum Router on a free loopback port
    pub async fn start<S>(router: Router<S>) -> std::io::Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        Router<S>: Into<Router>,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Config logging in with the mock's credentials, tenant and domain
    pub fn config(&self) -> InventoryConfig {
        let mut config = InventoryConfig::new(
            self.base_url(),
            MOCK_USERNAME,
            MOCK_PASSWORD,
            MOCK_TENANT,
            MOCK_DOMAIN,
        );
        config.timeout_secs = 5;
        config.connect_timeout_secs = 2;
        config
    }

    /// Log in to the server with [`TestServer::config`]
    pub async fn connect(&self) -> Result<NetBrainClient> {
        NetBrainClient::connect(&self.config()).await
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
