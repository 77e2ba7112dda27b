//! NetBrain REST API wire types

use pathprobe_core::{DeviceAttributes, GatewayRecord};
use serde::{Deserialize, Serialize};

// =============================================================================
// Session
// =============================================================================

/// Body of `GET /Session`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `GET /Session`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of `PUT /Session/CurrentDomain`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentDomainRequest {
    pub tenant_id: String,
    pub domain_id: String,
}

// =============================================================================
// Tenants and domains
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub tenant_id: String,
    pub tenant_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantList {
    pub tenants: Vec<Tenant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub domain_id: String,
    pub domain_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainList {
    pub domains: Vec<Domain>,
}

// =============================================================================
// CMDB
// =============================================================================

/// Response of `GET /CMDB/Path/Gateways`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayListResponse {
    pub gateway_list: Vec<GatewayRecord>,
}

/// Response of `GET /CMDB/Devices/Attributes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributesResponse {
    /// Null when the hostname is unknown
    #[serde(default)]
    pub attributes: Option<DeviceAttributes>,
}

/// Response of `GET /CMDB/Devices/DeviceRawData`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataResponse {
    pub content: String,
}

/// Error envelope NetBrain returns alongside non-success statuses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub status_code: Option<i64>,
    pub status_description: String,
}
