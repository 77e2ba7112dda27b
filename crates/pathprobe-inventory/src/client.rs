//! NetBrain HTTP client implementation

use async_trait::async_trait;
use pathprobe_core::{
    DeviceAttributes, GatewayRecord, HaState, Inventory, InventoryResult,
};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::config::InventoryConfig;
use crate::error::{NetBrainError, Result};
use crate::types::*;

/// Path of the REST API below the server URL
const API_PREFIX: &str = "ServicesAPI/API/V1/";

/// Header carrying the session token
const TOKEN_HEADER: &str = "Token";

/// Raw-data table holding the Palo Alto HA status
const HA_STATE_TABLE: &str = "HA State";

/// Resolve the API base for a server URL
fn api_base(url: &str) -> Result<Url> {
    Ok(Url::parse(&format!(
        "{}/{}",
        url.trim_end_matches('/'),
        API_PREFIX
    ))?)
}

/// Extract the HA state from the raw `HA State` table text.
///
/// The first `State: active|passive` occurrence wins; no match is `Unknown`.
pub fn parse_ha_state(content: &str) -> Result<HaState> {
    let state_finder = Regex::new(r"State: (active|passive)")
        .map_err(|e| NetBrainError::ParseError(e.to_string()))?;

    let state = match state_finder.captures(content).and_then(|c| c.get(1)) {
        Some(m) if m.as_str() == "active" => HaState::Active,
        Some(_) => HaState::Passive,
        None => HaState::Unknown,
    };
    Ok(state)
}

/// NetBrain REST API client
///
/// Holds an authenticated session scoped to one tenant and domain. Cloning
/// shares the underlying connection pool and session token.
#[derive(Debug, Clone)]
pub struct NetBrainClient {
    client: Client,
    base_url: Url,
    tenant_id: String,
    domain_id: String,
}

impl NetBrainClient {
    /// Log in and select the configured tenant and domain
    #[instrument(
        skip(config),
        fields(url = %config.url, tenant = %config.tenant, domain = %config.domain)
    )]
    pub async fn connect(config: &InventoryConfig) -> Result<Self> {
        let base_url = api_base(&config.url)?;
        let http = Self::builder(config).build()?;
        let token = Self::login(&http, &base_url, config).await?;

        let mut client = Self::with_token(&config.url, &token, config)?;
        client.tenant_id = client.find_tenant(&config.tenant).await?;
        client.domain_id = client.find_domain(&config.domain).await?;
        client.set_current_domain().await?;

        debug!(
            tenant_id = %client.tenant_id,
            domain_id = %client.domain_id,
            "NetBrain session ready"
        );
        Ok(client)
    }

    /// Create a client that sends an existing session token with every request.
    ///
    /// No tenant or domain is selected.
    pub fn with_token(url: &str, token: &str, config: &InventoryConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(token)
            .map_err(|e| NetBrainError::Authentication(format!("Invalid session token: {}", e)))?;
        headers.insert(TOKEN_HEADER, header_value);

        let client = Self::builder(config).default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: api_base(url)?,
            tenant_id: String::new(),
            domain_id: String::new(),
        })
    }

    fn builder(config: &InventoryConfig) -> ClientBuilder {
        Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .danger_accept_invalid_certs(!config.verify_tls)
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn domain_id(&self) -> &str {
        &self.domain_id
    }

    // =========================================================================
    // Session
    // =========================================================================

    async fn login(http: &Client, base_url: &Url, config: &InventoryConfig) -> Result<String> {
        let url = base_url.join("Session")?;
        debug!("Logging in to {}", url);

        // NetBrain takes the credentials as a JSON body on a GET
        let response = http
            .get(url)
            .json(&LoginRequest {
                username: &config.username,
                password: &config.password,
            })
            .send()
            .await?;

        let login: LoginResponse = handle_response(response).await?;
        if login.token.is_empty() {
            return Err(NetBrainError::Authentication(
                "login returned an empty token".to_string(),
            ));
        }
        Ok(login.token)
    }

    /// List the tenants visible to the session
    #[instrument(skip(self))]
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let url = self.base_url.join("CMDB/Tenants")?;
        let response = self.client.get(url).send().await?;
        handle_response::<TenantList>(response)
            .await
            .map(|r| r.tenants)
    }

    /// List the domains of the selected tenant
    #[instrument(skip(self))]
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let url = self.base_url.join("CMDB/Domains")?;
        let response = self
            .client
            .get(url)
            .query(&[("tenantid", self.tenant_id.as_str())])
            .send()
            .await?;
        handle_response::<DomainList>(response)
            .await
            .map(|r| r.domains)
    }

    async fn find_tenant(&self, name: &str) -> Result<String> {
        self.list_tenants()
            .await?
            .into_iter()
            .find(|t| t.tenant_name == name)
            .map(|t| t.tenant_id)
            .ok_or_else(|| NetBrainError::TenantNotFound(name.to_string()))
    }

    async fn find_domain(&self, name: &str) -> Result<String> {
        self.list_domains()
            .await?
            .into_iter()
            .find(|d| d.domain_name == name)
            .map(|d| d.domain_id)
            .ok_or_else(|| NetBrainError::DomainNotFound(name.to_string()))
    }

    async fn set_current_domain(&self) -> Result<()> {
        let url = self.base_url.join("Session/CurrentDomain")?;
        let response = self
            .client
            .put(url)
            .json(&CurrentDomainRequest {
                tenant_id: self.tenant_id.clone(),
                domain_id: self.domain_id.clone(),
            })
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(extract_error(response).await)
        }
    }

    // =========================================================================
    // CMDB queries
    // =========================================================================

    /// Gateways on the path of `ip_or_host`, in NetBrain's order
    #[instrument(skip(self))]
    pub async fn gateway_list(&self, ip_or_host: &str) -> Result<Vec<GatewayRecord>> {
        let url = self.base_url.join("CMDB/Path/Gateways")?;
        let response = self
            .client
            .get(url)
            .query(&[("ipOrHost", ip_or_host)])
            .send()
            .await?;

        let list: GatewayListResponse = handle_response(response).await?;
        debug!(count = list.gateway_list.len(), "Fetched gateway list");
        Ok(list.gateway_list)
    }

    /// Attributes of a device by hostname
    #[instrument(skip(self))]
    pub async fn device_attributes(&self, hostname: &str) -> Result<DeviceAttributes> {
        let url = self.base_url.join("CMDB/Devices/Attributes")?;
        let response = self
            .client
            .get(url)
            .query(&[("hostname", hostname)])
            .send()
            .await?;

        handle_response::<AttributesResponse>(response)
            .await?
            .attributes
            .ok_or_else(|| NetBrainError::NotFound(format!("device {}", hostname)))
    }

    /// Current HA state of a Palo Alto device
    #[instrument(skip(self))]
    pub async fn ha_state(&self, hostname: &str) -> Result<HaState> {
        let url = self.base_url.join("CMDB/Devices/DeviceRawData")?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("hostname", hostname),
                ("dataType", "1"),
                ("tableName", HA_STATE_TABLE),
            ])
            .send()
            .await?;

        let raw: RawDataResponse = handle_response(response).await?;
        parse_ha_state(&raw.content)
    }
}

#[async_trait]
impl Inventory for NetBrainClient {
    async fn list_gateway_candidates(
        &self,
        ip_or_host: &str,
    ) -> InventoryResult<Vec<GatewayRecord>> {
        Ok(self.gateway_list(ip_or_host).await?)
    }

    async fn get_device_attributes(&self, device_name: &str) -> InventoryResult<DeviceAttributes> {
        Ok(self.device_attributes(device_name).await?)
    }

    async fn get_ha_state(&self, device_name: &str) -> InventoryResult<HaState> {
        Ok(self.ha_state(device_name).await?)
    }
}

// =========================================================================
// Helper Methods
// =========================================================================

/// Handle response and deserialize JSON
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| NetBrainError::ParseError(e.to_string()))
    } else {
        Err(extract_error_from_status(response, status).await)
    }
}

/// Extract error from failed response
async fn extract_error(response: reqwest::Response) -> NetBrainError {
    let status = response.status();
    extract_error_from_status(response, status).await
}

async fn extract_error_from_status(
    response: reqwest::Response,
    status: StatusCode,
) -> NetBrainError {
    // Try to parse error response body
    let message = match response.json::<ErrorResponse>().await {
        Ok(err) => err.status_description,
        Err(_) => format!("HTTP {}", status),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            NetBrainError::Authentication(message)
        }
        StatusCode::NOT_FOUND => NetBrainError::NotFound(message),
        _ => NetBrainError::server_error(status.as_u16(), message),
    }
}
