//! OpenFlow actions
//!
//! An [`Action`] pairs an explicit `order` with one [`ActionKind`]. On the
//! wire each action is a mapping holding `order` plus exactly one
//! discriminator key naming the kind:
//!
//! ```text
//! {"order": 0, "output_action": {"output_node_connector": "3", "max_length": 60}}
//! ```
//!
//! Decoding recognizes every kind in [`ACTION_KEYS`]. Elements carrying no
//! recognized key are logged and skipped so that newer controller action
//! types do not break decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::document::string_or_number;
use crate::error::{Error, Result};
use crate::fields::{ProtocolMatchFields, VlanMatch};

/// Discriminator keys recognized by the decoder, in lookup order
pub const ACTION_KEYS: [&str; 32] = [
    "output_action",
    "push_vlan_action",
    "pop_vlan_action",
    "push_mpls_action",
    "pop_mpls_action",
    "set_field",
    "drop_action",
    "group_action",
    "set_queue_action",
    "set_vlan_id_action",
    "set_vlan_pcp_action",
    "set_vlan_cfi_action",
    "strip_vlan_action",
    "set_dl_src_action",
    "set_dl_dst_action",
    "set_nw_src_action",
    "set_nw_dst_action",
    "set_tp_src_action",
    "set_tp_dst_action",
    "push_pbb_action",
    "pop_pbb_action",
    "set_mpls_ttl_action",
    "dec_mpls_ttl",
    "set_nw_ttl_action",
    "dec_nw_ttl",
    "copy_ttl_out",
    "copy_ttl_in",
    "flood_action",
    "flood_all_action",
    "hw_path_action",
    "sw_path_action",
    "loopback_action",
];

/// One action with its position in the enclosing list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub order: u32,
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Every action kind this model can encode and decode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Forward to a port
    #[serde(rename = "output_action")]
    Output(OutputAction),
    /// Set the queue used when forwarding
    #[serde(rename = "set_queue_action")]
    SetQueue(SetQueueAction),
    /// Discard the packet
    #[serde(rename = "drop_action")]
    Drop {},
    /// Process through a group table entry
    #[serde(rename = "group_action")]
    Group(GroupAction),
    #[serde(rename = "set_vlan_id_action")]
    SetVlanId(SetVlanIdAction),
    #[serde(rename = "set_vlan_pcp_action")]
    SetVlanPcp(SetVlanPcpAction),
    #[serde(rename = "set_vlan_cfi_action")]
    SetVlanCfi(SetVlanCfiAction),
    #[serde(rename = "strip_vlan_action")]
    StripVlan {},
    #[serde(rename = "set_dl_src_action")]
    SetDlSrc(AddressAction),
    #[serde(rename = "set_dl_dst_action")]
    SetDlDst(AddressAction),
    #[serde(rename = "set_nw_src_action")]
    SetNwSrc(AddressAction),
    #[serde(rename = "set_nw_dst_action")]
    SetNwDst(AddressAction),
    #[serde(rename = "set_tp_src_action")]
    SetTpSrc(TransportPortAction),
    #[serde(rename = "set_tp_dst_action")]
    SetTpDst(TransportPortAction),
    /// Push a new outer VLAN tag (ether type 0x8100 or 0x88a8)
    #[serde(rename = "push_vlan_action")]
    PushVlan(PushVlanAction),
    /// Pop the outermost VLAN tag
    #[serde(rename = "pop_vlan_action")]
    PopVlan {},
    /// Push an MPLS shim header (ether type 0x8847 or 0x8848)
    #[serde(rename = "push_mpls_action")]
    PushMpls(EtherTypeAction),
    /// Pop the outermost MPLS header; the ether type is that of the payload
    #[serde(rename = "pop_mpls_action")]
    PopMpls(EtherTypeAction),
    #[serde(rename = "push_pbb_action")]
    PushPbb(EtherTypeAction),
    #[serde(rename = "pop_pbb_action")]
    PopPbb {},
    #[serde(rename = "set_mpls_ttl_action")]
    SetMplsTtl(SetMplsTtlAction),
    #[serde(rename = "dec_mpls_ttl")]
    DecMplsTtl {},
    #[serde(rename = "set_nw_ttl_action")]
    SetNwTtl(SetNwTtlAction),
    #[serde(rename = "dec_nw_ttl")]
    DecNwTtl {},
    #[serde(rename = "copy_ttl_out")]
    CopyTtlOut {},
    #[serde(rename = "copy_ttl_in")]
    CopyTtlIn {},
    /// Rewrite a header field. Only VLAN ID and MPLS label are modeled.
    #[serde(rename = "set_field")]
    SetField(SetFieldAction),
    #[serde(rename = "flood_action")]
    Flood {},
    #[serde(rename = "flood_all_action")]
    FloodAll {},
    #[serde(rename = "hw_path_action")]
    HwPath {},
    #[serde(rename = "sw_path_action")]
    SwPath {},
    #[serde(rename = "loopback_action")]
    Loopback {},
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAction {
    /// Output port number or reserved port name (`"CONTROLLER"`, `"FLOOD"`)
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub output_node_connector: Option<String>,
    /// Bytes to send to the controller; 0 means none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
}

impl OutputAction {
    pub fn port(&self) -> Option<&str> {
        self.output_node_connector.as_deref()
    }

    /// Max length, with 0 read as unset
    pub fn max_len(&self) -> Option<u16> {
        self.max_length.filter(|len| *len != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQueueAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVlanIdAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVlanPcpAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_pcp: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVlanCfiAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_cfi: Option<u8>,
}

/// Link-layer or network-layer address rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportPortAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushVlanAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_type: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcp: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfi: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
}

/// Payload of the push/pop header actions that carry only an ether type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtherTypeAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_type: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMplsTtlAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpls_ttl: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetNwTtlAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nw_ttl: Option<u8>,
}

/// Set-field action. Match groups serve as value containers here; only the
/// VLAN ID and the MPLS label are read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFieldAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_match: Option<VlanMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_match_fields: Option<ProtocolMatchFields>,
}

impl SetFieldAction {
    pub fn set_vlan_id(&mut self, vid: u16) {
        self.vlan_match.get_or_insert_with(Default::default).set_vid(vid);
    }

    pub fn vlan_id(&self) -> Option<u16> {
        self.vlan_match.as_ref().and_then(VlanMatch::vid)
    }

    pub fn set_mpls_label(&mut self, label: u32) {
        self.protocol_match_fields
            .get_or_insert_with(Default::default)
            .mpls_label = Some(label);
    }

    pub fn mpls_label(&self) -> Option<u32> {
        self.protocol_match_fields.as_ref().and_then(|p| p.mpls_label)
    }
}

impl ActionKind {
    /// Wire discriminator key for this kind
    pub fn key(&self) -> &'static str {
        match self {
            ActionKind::Output(_) => "output_action",
            ActionKind::SetQueue(_) => "set_queue_action",
            ActionKind::Drop {} => "drop_action",
            ActionKind::Group(_) => "group_action",
            ActionKind::SetVlanId(_) => "set_vlan_id_action",
            ActionKind::SetVlanPcp(_) => "set_vlan_pcp_action",
            ActionKind::SetVlanCfi(_) => "set_vlan_cfi_action",
            ActionKind::StripVlan {} => "strip_vlan_action",
            ActionKind::SetDlSrc(_) => "set_dl_src_action",
            ActionKind::SetDlDst(_) => "set_dl_dst_action",
            ActionKind::SetNwSrc(_) => "set_nw_src_action",
            ActionKind::SetNwDst(_) => "set_nw_dst_action",
            ActionKind::SetTpSrc(_) => "set_tp_src_action",
            ActionKind::SetTpDst(_) => "set_tp_dst_action",
            ActionKind::PushVlan(_) => "push_vlan_action",
            ActionKind::PopVlan {} => "pop_vlan_action",
            ActionKind::PushMpls(_) => "push_mpls_action",
            ActionKind::PopMpls(_) => "pop_mpls_action",
            ActionKind::PushPbb(_) => "push_pbb_action",
            ActionKind::PopPbb {} => "pop_pbb_action",
            ActionKind::SetMplsTtl(_) => "set_mpls_ttl_action",
            ActionKind::DecMplsTtl {} => "dec_mpls_ttl",
            ActionKind::SetNwTtl(_) => "set_nw_ttl_action",
            ActionKind::DecNwTtl {} => "dec_nw_ttl",
            ActionKind::CopyTtlOut {} => "copy_ttl_out",
            ActionKind::CopyTtlIn {} => "copy_ttl_in",
            ActionKind::SetField(_) => "set_field",
            ActionKind::Flood {} => "flood_action",
            ActionKind::FloodAll {} => "flood_all_action",
            ActionKind::HwPath {} => "hw_path_action",
            ActionKind::SwPath {} => "sw_path_action",
            ActionKind::Loopback {} => "loopback_action",
        }
    }
}

impl Action {
    pub fn new(order: u32, kind: ActionKind) -> Self {
        Self { order, kind }
    }

    pub fn output(order: u32, port: impl Into<String>, max_len: Option<u16>) -> Self {
        Self::new(
            order,
            ActionKind::Output(OutputAction {
                output_node_connector: Some(port.into()),
                max_length: max_len,
            }),
        )
    }

    pub fn drop(order: u32) -> Self {
        Self::new(order, ActionKind::Drop {})
    }

    pub fn push_vlan(order: u32, eth_type: u16) -> Self {
        Self::new(
            order,
            ActionKind::PushVlan(PushVlanAction {
                ethernet_type: Some(eth_type),
                ..Default::default()
            }),
        )
    }

    pub fn pop_vlan(order: u32) -> Self {
        Self::new(order, ActionKind::PopVlan {})
    }

    pub fn push_mpls(order: u32, eth_type: u16) -> Self {
        Self::new(
            order,
            ActionKind::PushMpls(EtherTypeAction {
                ethernet_type: Some(eth_type),
            }),
        )
    }

    pub fn pop_mpls(order: u32, eth_type: u16) -> Self {
        Self::new(
            order,
            ActionKind::PopMpls(EtherTypeAction {
                ethernet_type: Some(eth_type),
            }),
        )
    }

    pub fn set_vlan_id(order: u32, vid: u16) -> Self {
        let mut set_field = SetFieldAction::default();
        set_field.set_vlan_id(vid);
        Self::new(order, ActionKind::SetField(set_field))
    }

    pub fn set_mpls_label(order: u32, label: u32) -> Self {
        let mut set_field = SetFieldAction::default();
        set_field.set_mpls_label(label);
        Self::new(order, ActionKind::SetField(set_field))
    }

    pub fn group(order: u32, group_id: u32) -> Self {
        Self::new(
            order,
            ActionKind::Group(GroupAction {
                group: None,
                group_id: Some(group_id),
            }),
        )
    }

    /// Decode one list element.
    ///
    /// Returns `Ok(None)` when the element carries no recognized
    /// discriminator key. A recognized key with a malformed payload is an
    /// error.
    pub fn from_document(doc: &Value) -> Result<Option<Self>> {
        let obj = doc
            .as_object()
            .ok_or_else(|| Error::type_mismatch("Action", "dict", doc))?;

        let Some(key) = ACTION_KEYS.iter().find(|key| obj.contains_key(**key)) else {
            warn!(
                "skipping unrecognized action with keys {:?}",
                obj.keys().collect::<Vec<_>>()
            );
            return Ok(None);
        };

        let order = match obj.get("order") {
            Some(v) => u32::deserialize(v)?,
            None => 0,
        };

        let mut tagged = Map::with_capacity(1);
        tagged.insert((*key).to_string(), obj[*key].clone());
        let kind = ActionKind::deserialize(&Value::Object(tagged))?;

        Ok(Some(Self { order, kind }))
    }
}

/// Decode an action list, skipping elements that are not mappings or
/// carry no recognized kind. Encoded order is preserved.
pub fn decode_actions(items: &[Value]) -> Result<Vec<Action>> {
    let mut actions = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            warn!("skipping non-mapping action element: {}", item);
            continue;
        }
        if let Some(action) = Action::from_document(item)? {
            actions.push(action);
        }
    }
    Ok(actions)
}
