//! MPLS and PBB protocol match fields

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Fields of the first MPLS shim header and the first PBB service tag.
///
/// Also used as a value container by the set-field action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMatchFields {
    /// MPLS label (20 bits)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpls_label: Option<u32>,
    /// MPLS traffic class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpls_tc: Option<u8>,
    /// MPLS bottom-of-stack bit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpls_bos: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbb: Option<Pbb>,
}

/// PBB I-SID with optional mask
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbb_isid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbb_mask: Option<u32>,
}

impl ProtocolMatchFields {
    pub fn set_pbb_isid(&mut self, isid: u32, mask: Option<u32>) {
        self.pbb = Some(Pbb {
            pbb_isid: Some(isid),
            pbb_mask: mask,
        });
    }

    pub fn pbb_isid(&self) -> Option<u32> {
        self.pbb.as_ref().and_then(|p| p.pbb_isid)
    }
}

impl Document for ProtocolMatchFields {
    const NAME: &'static str = "ProtocolMatchFields";
}
