//! The controller capability consumed by the switch facade
//!
//! Transport, sessions and authentication belong to the implementor. The
//! facade only needs three verbs and the inventory URL layout.

use async_trait::async_trait;

use crate::config::ControllerConfig;

/// Content type the controller expects for RESTCONF JSON bodies
pub const YANG_JSON: &str = "application/yang.data+json";

/// Status code and body of one controller reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    /// `None` when the controller replied without a body
    pub content: Option<String>,
}

impl HttpResponse {
    pub fn new(status_code: u16, content: Option<&str>) -> Self {
        Self {
            status_code,
            content: content.map(str::to_string),
        }
    }
}

/// RESTCONF inventory URL layout for one controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryUrls {
    restconf_root: String,
    inventory_path: String,
}

impl InventoryUrls {
    pub fn new(restconf_root: &str, inventory_path: &str) -> Self {
        Self {
            restconf_root: restconf_root.trim_end_matches('/').to_string(),
            inventory_path: inventory_path.trim_matches('/').to_string(),
        }
    }

    /// `{root}/config/{inventory}/node/{node}`
    pub fn node_config(&self, node: &str) -> String {
        format!("{}/config/{}/node/{}", self.restconf_root, self.inventory_path, node)
    }

    /// `{root}/operational/{inventory}/node/{node}`
    pub fn node_operational(&self, node: &str) -> String {
        format!(
            "{}/operational/{}/node/{}",
            self.restconf_root, self.inventory_path, node
        )
    }
}

impl From<&ControllerConfig> for InventoryUrls {
    fn from(config: &ControllerConfig) -> Self {
        Self::new(&config.restconf_root, &config.inventory_path)
    }
}

/// Controller northbound API.
///
/// Every verb returns `None` when no response was received at all, which is
/// distinct from a reply with an empty body or an HTTP error status.
#[async_trait]
pub trait Controller: Send + Sync {
    async fn get(&self, url: &str) -> Option<HttpResponse>;

    async fn put(&self, url: &str, body: &str, headers: &[(&str, &str)]) -> Option<HttpResponse>;

    async fn delete(&self, url: &str) -> Option<HttpResponse>;

    /// Inventory URL layout of this controller
    fn urls(&self) -> &InventoryUrls;

    fn node_config_url(&self, node: &str) -> String {
        self.urls().node_config(node)
    }

    fn node_operational_url(&self, node: &str) -> String {
        self.urls().node_operational(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_urls() {
        let urls = InventoryUrls::new("http://10.0.0.5:8181/restconf/", "opendaylight-inventory:nodes");
        assert_eq!(
            urls.node_config("openflow:1"),
            "http://10.0.0.5:8181/restconf/config/opendaylight-inventory:nodes/node/openflow:1"
        );
        assert_eq!(
            urls.node_operational("openflow:1"),
            "http://10.0.0.5:8181/restconf/operational/opendaylight-inventory:nodes/node/openflow:1"
        );
    }

    #[test]
    fn test_urls_from_config() {
        let urls = InventoryUrls::from(&ControllerConfig::default());
        assert!(urls.node_config("openflow:2").starts_with("http://127.0.0.1:8181/restconf/config/"));
    }
}
