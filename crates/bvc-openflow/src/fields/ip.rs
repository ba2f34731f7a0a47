//! IP header match fields

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// DSCP, ECN and protocol number, shared by IPv4 and IPv6
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dscp: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_ecn: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_protocol: Option<u8>,
}

/// IPv6 flow label with optional mask
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Label {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_flabel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flabel_mask: Option<u32>,
}

/// IPv6 extension header pseudo-field with optional mask
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6ExtHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_exthdr: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_exthdr_mask: Option<u16>,
}

impl Ipv6Label {
    /// Set the label. The mask is replaced along with it.
    pub fn set(&mut self, flabel: u32, mask: Option<u32>) {
        self.ipv6_flabel = Some(flabel);
        self.flabel_mask = mask;
    }
}

impl Ipv6ExtHeader {
    /// Set the header bitmap. The mask is replaced along with it.
    pub fn set(&mut self, exthdr: u16, mask: Option<u16>) {
        self.ipv6_exthdr = Some(exthdr);
        self.ipv6_exthdr_mask = mask;
    }
}

impl Document for IpMatch {
    const NAME: &'static str = "IpMatch";
}

impl Document for Ipv6Label {
    const NAME: &'static str = "Ipv6Label";
}

impl Document for Ipv6ExtHeader {
    const NAME: &'static str = "Ipv6ExtHeader";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ip_match_decode() {
        let m = IpMatch::from_document(&json!({"ip_protocol": 6, "ip_dscp": 46})).unwrap();
        assert_eq!(m.ip_protocol, Some(6));
        assert_eq!(m.ip_dscp, Some(46));
        assert!(m.ip_ecn.is_none());
    }

    #[test]
    fn test_flabel_set_replaces_mask() {
        let mut l = Ipv6Label {
            ipv6_flabel: Some(1),
            flabel_mask: Some(0xff),
        };
        l.set(0x12345, None);
        assert_eq!(l.ipv6_flabel, Some(0x12345));
        assert!(l.flabel_mask.is_none());
    }

    #[test]
    fn test_exthdr_out_of_range_is_error() {
        assert!(Ipv6ExtHeader::from_document(&json!({"ipv6_exthdr": 70000})).is_err());
    }
}
