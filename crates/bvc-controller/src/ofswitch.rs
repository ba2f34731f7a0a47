//! OpenFlow switch facade
//!
//! Maps switch inventory queries and flow-table CRUD onto controller
//! requests. Every operation returns an [`Outcome`]; transport failures,
//! controller errors and missing data never surface as Rust errors.

use std::sync::Arc;

use bvc_openflow::{Document, FlowEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::controller::{Controller, HttpResponse, YANG_JSON};
use crate::inventory::{find_key_values, find_map_in_list, scalar_text, strip_str_in_values};
use crate::status::{OperStatus, Outcome, Status};

const INVENTORY_PREFIX: &str = "flow-node-inventory:";
const CAPABILITY_PREFIX: &str = "flow-node-inventory:flow-feature-capability-";

/// Descriptive data of a switch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SwitchInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Switch features with capability names shortened (`"flow-stats"`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buffers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tables: Option<u16>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Additional fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the port summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBrief {
    pub id: String,
    pub number: String,
    pub name: String,
    pub mac_address: String,
    /// Current feature, upper-cased (`"TEN-GB-FD COPPER"`)
    pub current_feature: String,
}

/// Result of one delete issued by [`OfSwitch::delete_flows`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDeletion {
    pub flow_id: String,
    pub status: OperStatus,
}

/// An OpenFlow switch known to the controller
pub struct OfSwitch {
    ctrl: Arc<dyn Controller>,
    name: String,
    dpid: Option<String>,
}

impl OfSwitch {
    /// Switch with inventory node id `name` (e.g., "openflow:1")
    pub fn new(ctrl: Arc<dyn Controller>, name: impl Into<String>) -> Self {
        Self {
            ctrl,
            name: name.into(),
            dpid: None,
        }
    }

    pub fn with_dpid(mut self, dpid: impl Into<String>) -> Self {
        self.dpid = Some(dpid.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dpid(&self) -> Option<&str> {
        self.dpid.as_deref()
    }

    /// Config-datastore URL of one flow
    pub fn flow_url(&self, table_id: u8, flow_id: &str) -> String {
        format!(
            "{}/table/{}/flow/{}",
            self.ctrl.node_config_url(&self.name),
            table_id,
            flow_id
        )
    }

    fn table_url(&self, table_id: u8, operational: bool) -> String {
        let node_url = if operational {
            self.ctrl.node_operational_url(&self.name)
        } else {
            self.ctrl.node_config_url(&self.name)
        };
        format!("{}/flow-node-inventory:table/{}", node_url, table_id)
    }

    // ========================================================================
    // Request helpers
    // ========================================================================

    /// GET a document and pick the wanted part out of it. `extract`
    /// returning `None` means the expected key path was missing.
    async fn get_document<T>(&self, url: &str, extract: impl FnOnce(Value) -> Option<T>) -> Outcome<T> {
        debug!("GET {}", url);
        let resp = match check_response(self.ctrl.get(url).await) {
            Ok(resp) => resp,
            Err(status) => return log_failure("GET", url, status),
        };

        let body = resp.content.as_deref().unwrap_or_default();
        let doc: Value = match serde_json::from_str(body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("GET {}: response is not JSON: {}", url, e);
                return Outcome::failed(OperStatus::new(Status::MalformData));
            }
        };

        match extract(doc) {
            Some(data) => Outcome::ok(data),
            None => log_failure("GET", url, OperStatus::new(Status::DataNotFound)),
        }
    }

    async fn delete_url(&self, url: &str) -> Outcome<()> {
        debug!("DELETE {}", url);
        match check_response(self.ctrl.delete(url).await) {
            Ok(_) => Outcome::done(),
            Err(status) => log_failure("DELETE", url, status),
        }
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    /// Manufacturer, serial number, software, hardware and description
    pub async fn get_switch_info(&self) -> Outcome<SwitchInfo> {
        let url = self.ctrl.node_operational_url(&self.name);
        self.get_document(&url, |doc| {
            doc.get("node")?;
            let first = |key: &str| {
                find_key_values(&doc, &format!("{}{}", INVENTORY_PREFIX, key))
                    .first()
                    .and_then(|v| scalar_text(v))
            };
            Some(SwitchInfo {
                manufacturer: first("manufacturer"),
                serial_number: first("serial-number"),
                software: first("software"),
                hardware: first("hardware"),
                description: first("description"),
            })
        })
        .await
    }

    pub async fn get_features_info(&self) -> Outcome<SwitchFeatures> {
        let url = self.ctrl.node_operational_url(&self.name);
        self.get_document(&url, |doc| {
            let features = find_key_values(&doc, "flow-node-inventory:switch-features")
                .into_iter()
                .next()
                .filter(|v| v.is_object())?;
            let stripped = strip_str_in_values(features, CAPABILITY_PREFIX);
            match SwitchFeatures::deserialize(&stripped) {
                Ok(features) => Some(features),
                Err(e) => {
                    warn!("unexpected switch-features layout: {}", e);
                    None
                }
            }
        })
        .await
    }

    /// Port numbers of every node connector
    pub async fn get_ports_list(&self) -> Outcome<Vec<String>> {
        let url = self.ctrl.node_operational_url(&self.name);
        self.get_document(&url, |doc| {
            let nodes = doc.get("node")?.as_array()?;
            let ports = find_map_in_list(nodes, "node-connector")
                .and_then(|node| node.get("node-connector"))
                .and_then(Value::as_array)
                .map(|connectors| {
                    connectors
                        .iter()
                        .filter_map(|c| c.get("flow-node-inventory:port-number"))
                        .filter_map(scalar_text)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            Some(ports)
        })
        .await
    }

    pub async fn get_ports_brief_info(&self) -> Outcome<Vec<PortBrief>> {
        let url = self.ctrl.node_operational_url(&self.name);
        self.get_document(&url, |doc| {
            let connectors = find_key_values(&doc, "node-connector")
                .into_iter()
                .next()?
                .as_array()?;
            connectors.iter().map(port_brief).collect::<Option<Vec<_>>>()
        })
        .await
    }

    /// Full operational record of one port
    pub async fn get_port_detail_info(&self, port: &str) -> Outcome<Value> {
        let url = format!(
            "{}/node-connector/{}:{}",
            self.ctrl.node_operational_url(&self.name),
            self.name,
            port
        );
        self.get_document(&url, |doc| first_object(doc, "node-connector")).await
    }

    // ========================================================================
    // Flow CRUD
    // ========================================================================

    /// Install or replace a flow in the config datastore
    pub async fn add_modify_flow(&self, flow: &FlowEntry) -> Outcome<()> {
        let (table_id, flow_id) = match flow.identity() {
            Ok(identity) => identity,
            Err(e) => {
                warn!("cannot install flow: {}", e);
                return Outcome::failed(OperStatus::new(Status::MalformData));
            }
        };
        let payload = match flow.payload_string() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("cannot encode flow {}: {}", flow_id, e);
                return Outcome::failed(OperStatus::new(Status::MalformData));
            }
        };

        let url = self.flow_url(table_id, flow_id);
        debug!("PUT {}", url);
        let headers = [("content-type", YANG_JSON)];
        match check_response(self.ctrl.put(&url, &payload, &headers).await) {
            Ok(_) => {
                info!("Installed flow {} in table {} on {}", flow_id, table_id, self.name);
                Outcome::done()
            }
            Err(status) => log_failure("PUT", &url, status),
        }
    }

    pub async fn delete_flow(&self, table_id: u8, flow_id: &str) -> Outcome<()> {
        self.delete_url(&self.flow_url(table_id, flow_id)).await
    }

    /// Delete every configured flow of a table, one request per flow in
    /// listed order. The outcome status reports the initial fetch; each
    /// attempted delete is reported in the data. Failures do not stop the
    /// remaining deletes and nothing is rolled back.
    pub async fn delete_flows(&self, table_id: u8) -> Outcome<Vec<FlowDeletion>> {
        let fetched = self.get_configured_flow_entries(table_id).await;
        let Some(flows) = fetched.data else {
            return Outcome::failed(fetched.status);
        };

        let mut results = Vec::with_capacity(flows.len());
        for flow in &flows {
            let Some(flow_id) = flow.flow_id() else {
                warn!("skipping configured flow without an id in table {}", table_id);
                continue;
            };
            let outcome = self.delete_flow(table_id, flow_id).await;
            results.push(FlowDeletion {
                flow_id: flow_id.to_string(),
                status: outcome.status,
            });
        }

        let failed = results.iter().filter(|r| !r.status.is_ok()).count();
        if failed > 0 {
            warn!("{} of {} deletes failed in table {}", failed, results.len(), table_id);
        }
        Outcome::ok(results)
    }

    /// Raw flow documents of a table
    pub async fn get_flows(&self, table_id: u8, operational: bool) -> Outcome<Vec<Value>> {
        let url = self.table_url(table_id, operational);
        self.get_document(&url, |doc| {
            let mut table = first_object(doc, "flow-node-inventory:table")?;
            match table.get_mut("flow")?.take() {
                Value::Array(items) => Some(items),
                _ => None,
            }
        })
        .await
    }

    pub async fn get_operational_flows(&self, table_id: u8) -> Outcome<Vec<Value>> {
        self.get_flows(table_id, true).await
    }

    pub async fn get_configured_flows(&self, table_id: u8) -> Outcome<Vec<Value>> {
        self.get_flows(table_id, false).await
    }

    /// Raw document of one configured flow
    pub async fn get_configured_flow(&self, table_id: u8, flow_id: &str) -> Outcome<Value> {
        let url = self.flow_url(table_id, flow_id);
        self.get_document(&url, |doc| first_object(doc, "flow-node-inventory:flow"))
            .await
    }

    pub async fn get_flow_entries(&self, table_id: u8, operational: bool) -> Outcome<Vec<FlowEntry>> {
        let fetched = self.get_flows(table_id, operational).await;
        let Some(docs) = fetched.data else {
            return Outcome::failed(fetched.status);
        };

        let mut entries = Vec::with_capacity(docs.len());
        for doc in &docs {
            match FlowEntry::from_document(doc) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("cannot decode flow in table {}: {}", table_id, e);
                    return Outcome::failed(OperStatus::new(Status::MalformData));
                }
            }
        }
        Outcome::ok(entries)
    }

    pub async fn get_operational_flow_entries(&self, table_id: u8) -> Outcome<Vec<FlowEntry>> {
        self.get_flow_entries(table_id, true).await
    }

    pub async fn get_configured_flow_entries(&self, table_id: u8) -> Outcome<Vec<FlowEntry>> {
        self.get_flow_entries(table_id, false).await
    }

    pub async fn get_configured_flow_entry(&self, table_id: u8, flow_id: &str) -> Outcome<FlowEntry> {
        let fetched = self.get_configured_flow(table_id, flow_id).await;
        let Some(doc) = fetched.data else {
            return Outcome::failed(fetched.status);
        };
        match FlowEntry::from_document(&doc) {
            Ok(entry) => Outcome::ok(entry),
            Err(e) => {
                warn!("cannot decode flow {}: {}", flow_id, e);
                Outcome::failed(OperStatus::new(Status::MalformData))
            }
        }
    }
}

/// Classify a controller reply. Only a 200 with a body passes.
pub fn check_response(resp: Option<HttpResponse>) -> Result<HttpResponse, OperStatus> {
    match resp {
        None => Err(OperStatus::new(Status::ConnError)),
        Some(resp) if resp.content.is_none() => Err(OperStatus::new(Status::CtrlInternalError)),
        Some(resp) if resp.status_code == 200 => Ok(resp),
        Some(resp) => Err(OperStatus::http_error(resp)),
    }
}

fn log_failure<T>(method: &str, url: &str, status: OperStatus) -> Outcome<T> {
    warn!("{} {} failed: {}", method, url, status.detailed());
    Outcome::failed(status)
}

/// First element of the list under `key`, if it is a mapping
fn first_object(mut doc: Value, key: &str) -> Option<Value> {
    match doc.get_mut(key)?.as_array_mut()?.first_mut()?.take() {
        obj @ Value::Object(_) => Some(obj),
        _ => None,
    }
}

fn port_brief(connector: &Value) -> Option<PortBrief> {
    let field = |key: &str| {
        connector
            .get(format!("{}{}", INVENTORY_PREFIX, key).as_str())
            .and_then(scalar_text)
    };
    Some(PortBrief {
        id: connector.get("id").and_then(scalar_text)?,
        number: field("port-number")?,
        name: field("name")?,
        mac_address: field("hardware-address")?,
        current_feature: field("current-feature")?.to_uppercase(),
    })
}
