use serde::{Deserialize, Serialize};

use crate::document::Document;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmpv4_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmpv4_code: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpV6Match {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmpv6_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmpv6_code: Option<u8>,
}

impl Document for IcmpMatch {
    const NAME: &'static str = "IcmpMatch";
}

impl Document for IcmpV6Match {
    const NAME: &'static str = "IcmpV6Match";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_icmp_decode() {
        let m = IcmpMatch::from_document(&json!({"icmpv4_type": 8, "icmpv4_code": 0})).unwrap();
        assert_eq!(m.icmpv4_type, Some(8));
        assert_eq!(m.icmpv4_code, Some(0));
    }

    #[test]
    fn test_icmpv6_rejects_list() {
        assert!(IcmpV6Match::from_document(&json!([135])).is_err());
    }
}
