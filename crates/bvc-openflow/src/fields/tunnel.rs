use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Logical port metadata (tunnel ID)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunnel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel_mask: Option<u64>,
}

/// Table metadata passed between pipeline stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_mask: Option<u64>,
}

impl Document for Tunnel {
    const NAME: &'static str = "Tunnel";
}

impl Document for Metadata {
    const NAME: &'static str = "Metadata";
}
