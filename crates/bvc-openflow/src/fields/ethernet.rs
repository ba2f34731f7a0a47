//! Ethernet header match fields

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Ethernet match fields: type of the payload after VLAN tags, plus
/// source and destination MAC addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_type: Option<EthernetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_source: Option<HardwareAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_destination: Option<HardwareAddress>,
}

/// Wrapper for the EtherType value (`{"type": 2048}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetType {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub eth_type: Option<u16>,
}

/// A MAC address with optional mask, as used by Ethernet and ARP matches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
}

impl HardwareAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            mask: None,
        }
    }
}

impl EthernetMatch {
    pub fn set_type(&mut self, eth_type: u16) {
        self.ethernet_type
            .get_or_insert_with(Default::default)
            .eth_type = Some(eth_type);
    }

    pub fn eth_type(&self) -> Option<u16> {
        self.ethernet_type.as_ref().and_then(|t| t.eth_type)
    }

    pub fn set_src(&mut self, address: impl Into<String>) {
        self.ethernet_source
            .get_or_insert_with(Default::default)
            .address = Some(address.into());
    }

    pub fn src(&self) -> Option<&str> {
        self.ethernet_source.as_ref().and_then(|a| a.address.as_deref())
    }

    pub fn set_dst(&mut self, address: impl Into<String>) {
        self.ethernet_destination
            .get_or_insert_with(Default::default)
            .address = Some(address.into());
    }

    pub fn dst(&self) -> Option<&str> {
        self.ethernet_destination.as_ref().and_then(|a| a.address.as_deref())
    }
}

impl Document for EthernetMatch {
    const NAME: &'static str = "EthernetMatch";
}

impl Document for HardwareAddress {
    const NAME: &'static str = "HardwareAddress";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let m = EthernetMatch::from_document(&json!({
            "ethernet_type": {"type": 2048},
            "ethernet_source": {"address": "00:00:00:00:00:01"},
            "ethernet_frobnicator": true
        }))
        .unwrap();
        assert_eq!(m.eth_type(), Some(0x0800));
        assert_eq!(m.src(), Some("00:00:00:00:00:01"));
        assert!(m.dst().is_none());
    }

    #[test]
    fn test_setters_allocate_wrappers() {
        let mut m = EthernetMatch::default();
        m.set_dst("ff:ff:ff:ff:ff:ff");
        m.set_type(0x0806);
        let doc = m.to_document().unwrap();
        assert_eq!(
            doc,
            json!({
                "ethernet_type": {"type": 2054},
                "ethernet_destination": {"address": "ff:ff:ff:ff:ff:ff"}
            })
        );
    }
}
