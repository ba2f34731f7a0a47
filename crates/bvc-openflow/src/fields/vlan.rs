//! 802.1Q VLAN match fields

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// VLAN match fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanMatch {
    /// VLAN-ID from the 802.1Q header, wrapped with its presence flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<VlanId>,
    /// VLAN-PCP from the 802.1Q header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_pcp: Option<u8>,
}

/// `{vlan_id, vlan_id_present}` sub-record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id_present: Option<bool>,
}

impl VlanId {
    pub fn new(vid: u16) -> Self {
        Self {
            vlan_id: Some(vid),
            vlan_id_present: Some(true),
        }
    }
}

impl VlanMatch {
    /// Set the VLAN ID. The presence flag is always forced on.
    pub fn set_vid(&mut self, vid: u16) {
        self.vlan_id = Some(VlanId::new(vid));
    }

    pub fn vid(&self) -> Option<u16> {
        self.vlan_id.as_ref().and_then(|v| v.vlan_id)
    }

    pub fn vid_present(&self) -> Option<bool> {
        self.vlan_id.as_ref().and_then(|v| v.vlan_id_present)
    }

    pub fn set_pcp(&mut self, pcp: u8) {
        self.vlan_pcp = Some(pcp);
    }

    pub fn pcp(&self) -> Option<u8> {
        self.vlan_pcp
    }
}

impl Document for VlanMatch {
    const NAME: &'static str = "VlanMatch";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_vid_forces_present() {
        let mut m = VlanMatch::default();
        m.set_vid(100);
        assert_eq!(m.vid(), Some(100));
        assert_eq!(m.vid_present(), Some(true));
    }

    #[test]
    fn test_decode_nested_vlan_id() {
        let m = VlanMatch::from_document(&json!({
            "vlan_id": {"vlan_id": 10, "vlan_id_present": true},
            "vlan_pcp": 3
        }))
        .unwrap();
        assert_eq!(m.vid(), Some(10));
        assert_eq!(m.pcp(), Some(3));
    }

    #[test]
    fn test_missing_vlan_id_reads_as_none() {
        let m = VlanMatch::from_document(&json!({"vlan_pcp": 1})).unwrap();
        assert!(m.vid().is_none());
        assert!(m.vid_present().is_none());
    }
}
