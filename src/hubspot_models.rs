use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contact properties requested from HubSpot for every lead.
pub const CONTACT_PROPERTIES: [&str; 3] = ["createdate", "hs_lead_status", "hubspot_owner_id"];

/// HubSpot contact as returned by the CRM v3 API.
///
/// Property values are kept as raw JSON: HubSpot returns strings, but older
/// exports and proxies have been seen sending numbers for ids and timestamps.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HubspotContact {
    /// Contact id (string, occasionally numeric)
    pub id: Value,

    /// Requested contact properties
    #[serde(default)]
    pub properties: ContactProperties,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactProperties {
    /// Creation time, epoch milliseconds as a numeric string
    #[serde(default)]
    pub createdate: Value,

    /// Lead status (e.g., "NEW", "OPEN", "IN_PROGRESS")
    #[serde(default)]
    pub hs_lead_status: Option<String>,

    /// Assigned owner id; empty string or null when unassigned
    #[serde(default)]
    pub hubspot_owner_id: Value,
}

/// One page of `POST /crm/v3/objects/contacts/search`.
///
/// Results stay as raw JSON so one malformed contact only drops itself.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactSearchResponse {
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub results: Vec<Value>,

    #[serde(default)]
    pub paging: Option<Paging>,
}

impl ContactSearchResponse {
    /// Cursor for the following page, if HubSpot reported one.
    pub fn next_after(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .map(|n| n.after.as_str())
            .filter(|after| !after.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<NextPage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NextPage {
    pub after: String,
}

/// Search request body (JSON, camelCase as HubSpot expects).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSearchRequest {
    pub filter_groups: Vec<FilterGroup>,
    pub properties: Vec<&'static str>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterGroup {
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub property_name: &'static str,
    pub operator: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_value: Option<String>,
}

impl ContactSearchRequest {
    /// Contacts created between two epoch-millisecond bounds (inclusive).
    pub fn created_between(start_ms: i64, end_ms: i64, limit: u32) -> Self {
        Self {
            filter_groups: vec![FilterGroup {
                filters: vec![Filter {
                    property_name: "createdate",
                    operator: "BETWEEN",
                    value: start_ms.to_string(),
                    high_value: Some(end_ms.to_string()),
                }],
            }],
            properties: CONTACT_PROPERTIES.to_vec(),
            limit,
            after: None,
        }
    }
}
