//! Flow entry: the aggregate root of the model
//!
//! A [`FlowEntry`] is either built empty and filled in through setters, or
//! decoded whole from controller JSON. Decoding first renames controller
//! keys to model naming (see [`crate::naming`]); encoding for the controller
//! reverses that and wraps the result under [`FLOW_PAYLOAD_KEY`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{string_or_number, Document};
use crate::error::{Error, Result};
use crate::instruction::{Instruction, Instructions};
use crate::matches::Match;
use crate::naming;

/// Top-level key wrapping a flow entry in controller payloads
pub const FLOW_PAYLOAD_KEY: &str = "flow-node-inventory:flow";

/// One rule in a switch flow table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowEntry {
    /// Flow identifier, unique within its table
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Opaque controller-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_mask: Option<u64>,
    /// Flow table within the switch pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Idle time before discarding, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<u16>,
    /// Max time before discarding, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_timeout: Option<u16>,
    /// Strict match on priority and all fields when modifying or deleting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_port: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_group: Option<u32>,
    /// Flow-mod flags, as the controller's space-separated bit names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_name: Option<String>,
    #[serde(rename = "installHw", default, skip_serializing_if = "Option::is_none")]
    pub install_hw: Option<bool>,
    /// Send a barrier after this flow-mod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barrier: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_id: Option<u32>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub flow_match: Option<Match>,
    #[serde(default, deserialize_with = "instructions_or_empty")]
    pub instructions: Instructions,
    /// Counters, present only on flows read from operational state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_statistics: Option<FlowStatistics>,
    /// Keys without a typed field
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Operational counters of a flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<FlowDuration>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nanosecond: Option<u64>,
}

impl Document for FlowEntry {
    const NAME: &'static str = "FlowEntry";

    /// Decode a flow from controller naming. Keys are renamed before any
    /// field is read.
    fn from_document(doc: &Value) -> Result<Self> {
        if !doc.is_object() {
            return Err(Error::type_mismatch(Self::NAME, "dict", doc));
        }
        let normalized = naming::underscore_keys(doc.clone());
        let flow = Self::deserialize(&normalized)?;
        if !flow.extra.is_empty() {
            debug!(
                "flow {:?} carries untyped keys {:?}",
                flow.id,
                flow.extra.keys().collect::<Vec<_>>()
            );
        }
        Ok(flow)
    }
}

impl FlowEntry {
    /// Empty flow entry, to be filled in with setters
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from exactly one source. Supplying both is rejected before
    /// anything is decoded; supplying neither yields an empty entry.
    pub fn decode(json: Option<&str>, doc: Option<&Value>) -> Result<Self> {
        match (json, doc) {
            (Some(_), Some(_)) => Err(Error::ConflictingSources),
            (Some(text), None) => Self::from_json(text),
            (None, Some(doc)) => Self::from_document(doc),
            (None, None) => Ok(Self::new()),
        }
    }

    /// Decode from JSON text in controller naming
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_document(&doc)
    }

    /// Pretty JSON in model naming, keys sorted
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    /// Controller payload: hyphenated keys (except `table_id` and
    /// `cookie_mask`), nulls stripped, wrapped under [`FLOW_PAYLOAD_KEY`]
    pub fn payload(&self) -> Result<Value> {
        let body = naming::strip_nulls(naming::hyphenate_keys(self.to_document()?));
        let mut wrapper = Map::with_capacity(1);
        wrapper.insert(FLOW_PAYLOAD_KEY.to_string(), body);
        Ok(Value::Object(wrapper))
    }

    pub fn payload_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.payload()?)?)
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    // ========================================================================
    // Identity and attributes
    // ========================================================================

    pub fn set_flow_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn flow_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_table_id(&mut self, table_id: u8) {
        self.table_id = Some(table_id);
    }

    pub fn table_id(&self) -> Option<u8> {
        self.table_id
    }

    /// `(table_id, id)`, both of which a flow needs before it can be installed
    pub fn identity(&self) -> Result<(u8, &str)> {
        let table_id = self.table_id.ok_or_else(|| Error::missing_field("table_id"))?;
        let flow_id = self.flow_id().ok_or_else(|| Error::missing_field("id"))?;
        Ok((table_id, flow_id))
    }

    pub fn set_flow_name(&mut self, name: impl Into<String>) {
        self.flow_name = Some(name.into());
    }

    pub fn flow_name(&self) -> Option<&str> {
        self.flow_name.as_deref()
    }

    pub fn set_priority(&mut self, priority: u16) {
        self.priority = Some(priority);
    }

    pub fn priority(&self) -> Option<u16> {
        self.priority
    }

    pub fn set_cookie(&mut self, cookie: u64) {
        self.cookie = Some(cookie);
    }

    pub fn cookie(&self) -> Option<u64> {
        self.cookie
    }

    pub fn set_cookie_mask(&mut self, mask: u64) {
        self.cookie_mask = Some(mask);
    }

    pub fn cookie_mask(&self) -> Option<u64> {
        self.cookie_mask
    }

    pub fn set_idle_timeout(&mut self, secs: u16) {
        self.idle_timeout = Some(secs);
    }

    pub fn idle_timeout(&self) -> Option<u16> {
        self.idle_timeout
    }

    pub fn set_hard_timeout(&mut self, secs: u16) {
        self.hard_timeout = Some(secs);
    }

    pub fn hard_timeout(&self) -> Option<u16> {
        self.hard_timeout
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = Some(strict);
    }

    pub fn set_install_hw(&mut self, install_hw: bool) {
        self.install_hw = Some(install_hw);
    }

    pub fn set_barrier(&mut self, barrier: bool) {
        self.barrier = Some(barrier);
    }

    pub fn set_buffer_id(&mut self, buffer_id: u32) {
        self.buffer_id = Some(buffer_id);
    }

    pub fn set_out_port(&mut self, port: u64) {
        self.out_port = Some(port);
    }

    pub fn set_out_group(&mut self, group: u32) {
        self.out_group = Some(group);
    }

    pub fn set_flags(&mut self, flags: impl Into<String>) {
        self.flags = Some(flags.into());
    }

    // ========================================================================
    // Match and instructions
    // ========================================================================

    /// Attach the match. A flow has at most one.
    pub fn add_match(&mut self, flow_match: Match) -> Result<()> {
        if self.flow_match.is_some() {
            return Err(Error::DuplicateMatch);
        }
        self.flow_match = Some(flow_match);
        Ok(())
    }

    pub fn match_fields(&self) -> Option<&Match> {
        self.flow_match.as_ref()
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions.instruction
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Seconds alive, only when both `second` and `nanosecond` are known
    pub fn duration(&self) -> Option<f64> {
        let d = self.flow_statistics.as_ref()?.duration.as_ref()?;
        let (s, ns) = (d.second?, d.nanosecond?);
        Some((s as f64 * 1e9 + ns as f64) / 1e9)
    }

    pub fn packet_count(&self) -> Option<u64> {
        self.flow_statistics.as_ref().and_then(|s| s.packet_count)
    }

    pub fn byte_count(&self) -> Option<u64> {
        self.flow_statistics.as_ref().and_then(|s| s.byte_count)
    }
}

/// An explicit `null` container reads as no instructions
fn instructions_or_empty<'de, D>(deserializer: D) -> std::result::Result<Instructions, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Instructions>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use serde_json::json;

    fn operational_flow() -> Value {
        json!({
            "id": "L2switch-7",
            "table_id": 0,
            "priority": 2,
            "cookie": 3026418949592973317u64,
            "idle-timeout": 0,
            "hard-timeout": 0,
            "flags": "",
            "match": {
                "in-port": "openflow:1:2",
                "ethernet-match": {"ethernet-type": {"type": 2048}}
            },
            "instructions": {"instruction": [
                {"order": 0, "apply-actions": {"action": [
                    {"order": 0, "output-action": {"output-node-connector": "3", "max-length": 65535}}
                ]}}
            ]},
            "opendaylight-flow-statistics:flow-statistics": {
                "packet-count": 12,
                "byte-count": 1176,
                "duration": {"second": 5, "nanosecond": 500000000}
            }
        })
    }

    #[test]
    fn test_decode_operational_flow() {
        let flow = FlowEntry::from_document(&operational_flow()).unwrap();
        assert_eq!(flow.flow_id(), Some("L2switch-7"));
        assert_eq!(flow.table_id(), Some(0));
        assert_eq!(flow.idle_timeout(), Some(0));
        assert_eq!(flow.packet_count(), Some(12));
        assert_eq!(flow.byte_count(), Some(1176));
        assert_eq!(flow.duration(), Some(5.5));
        let m = flow.match_fields().unwrap();
        assert_eq!(m.in_port(), Some("2"));
        assert_eq!(m.eth_type(), Some(0x0800));
        assert_eq!(flow.instructions().len(), 1);
    }

    #[test]
    fn test_missing_match_is_none() {
        let flow = FlowEntry::from_document(&json!({"id": "1", "table_id": 0})).unwrap();
        assert!(flow.match_fields().is_none());
    }

    #[test]
    fn test_duration_requires_both_parts() {
        let flow = FlowEntry::from_document(&json!({
            "flow_statistics": {"duration": {"second": 5}}
        }))
        .unwrap();
        assert!(flow.duration().is_none());
    }

    #[test]
    fn test_decode_both_sources_rejected() {
        let doc = json!({"id": "1"});
        let err = FlowEntry::decode(Some("{\"id\": \"1\"}"), Some(&doc)).unwrap_err();
        assert!(matches!(err, Error::ConflictingSources));
    }

    #[test]
    fn test_decode_rejects_non_mapping() {
        let err = FlowEntry::from_document(&json!(["id", "1"])).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { found: "list", .. }));
        let err = FlowEntry::from_json("42").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { found: "number", .. }));
    }

    #[test]
    fn test_add_match_twice_rejected() {
        let mut flow = FlowEntry::new();
        flow.add_match(Match::new()).unwrap();
        assert!(matches!(flow.add_match(Match::new()), Err(Error::DuplicateMatch)));
    }

    #[test]
    fn test_identity_requires_table_and_id() {
        let mut flow = FlowEntry::new();
        assert!(matches!(flow.identity(), Err(Error::MissingField(f)) if f == "table_id"));
        flow.set_table_id(3);
        assert!(matches!(flow.identity(), Err(Error::MissingField(f)) if f == "id"));
        flow.set_flow_id("12");
        assert_eq!(flow.identity().unwrap(), (3, "12"));
    }

    #[test]
    fn test_null_containers_decode_empty() {
        let flow = FlowEntry::from_document(&json!({"id": "1", "instructions": null, "match": null})).unwrap();
        assert!(flow.instructions().is_empty());
        assert!(flow.match_fields().is_none());
        assert_eq!(flow.flow_id(), Some("1"));
    }

    #[test]
    fn test_go_to_table_round_trip() {
        let doc = json!({
            "id": "5",
            "table_id": 0,
            "instructions": {"instruction": [{"order": 0, "go-to-table": {"table_id": 2}}]}
        });
        let flow = FlowEntry::from_document(&doc).unwrap();
        assert_eq!(flow.instructions(), &[Instruction::goto_table(0, 2)]);

        let payload = flow.payload().unwrap();
        assert_eq!(
            payload[FLOW_PAYLOAD_KEY]["instructions"]["instruction"][0],
            json!({"order": 0, "go-to-table": {"table_id": 2}})
        );
    }

    #[test]
    fn test_nested_decode_error_prefixed_once() {
        let doc = json!({"instructions": {"instruction": [{"order": 0, "apply-actions": {"action": [
            {"order": 0, "output-action": {"output-node-connector": "1", "max-length": 70000}}
        ]}}]}});
        let err = FlowEntry::from_document(&doc).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        let msg = err.to_string();
        assert_eq!(msg.matches("JSON error").count(), 1, "{}", msg);
        assert!(msg.contains("70000"), "{}", msg);
    }

    #[test]
    fn test_payload_naming() {
        let mut flow = FlowEntry::new();
        flow.set_flow_id("12");
        flow.set_table_id(0);
        flow.set_cookie_mask(255);
        flow.set_hard_timeout(30);
        flow.set_install_hw(false);
        flow.set_flow_name("my_flow");
        let mut m = Match::new();
        m.set_eth_type(0x0800);
        m.set_ipv4_dst("10.0.0.1/32");
        flow.add_match(m).unwrap();
        let mut inst = Instruction::apply_actions(0);
        inst.add_apply_action(Action::drop(0));
        flow.add_instruction(inst);

        let payload = flow.payload().unwrap();
        let body = &payload[FLOW_PAYLOAD_KEY];
        assert_eq!(body["table_id"], 0);
        assert_eq!(body["cookie_mask"], 255);
        assert_eq!(body["hard-timeout"], 30);
        assert_eq!(body["installHw"], false);
        // names are values, never renamed
        assert_eq!(body["flow-name"], "my_flow");
        assert_eq!(body["match"]["ethernet-match"]["ethernet-type"]["type"], 2048);
        assert_eq!(body["match"]["ipv4-destination"], "10.0.0.1/32");
        assert!(body["instructions"]["instruction"][0]["apply-actions"]["action"][0]
            .get("drop-action")
            .is_some());
        assert!(body.get("priority").is_none());
    }

    #[test]
    fn test_payload_strips_null_extras() {
        let flow = FlowEntry::from_document(&json!({"id": "1", "vendor_note": null})).unwrap();
        let payload = flow.payload().unwrap();
        assert!(payload[FLOW_PAYLOAD_KEY].get("vendor-note").is_none());
    }

    #[test]
    fn test_payload_decodes_back() {
        let flow = FlowEntry::from_document(&operational_flow()).unwrap();
        let payload = flow.payload().unwrap();
        let again = FlowEntry::from_document(&payload[FLOW_PAYLOAD_KEY]).unwrap();
        assert_eq!(again, flow);
    }

    #[test]
    fn test_to_json_sorted_keys() {
        let mut flow = FlowEntry::new();
        flow.set_priority(5);
        flow.set_flow_id("a");
        let text = flow.to_json().unwrap();
        let id_at = text.find("\"id\"").unwrap();
        let prio_at = text.find("\"priority\"").unwrap();
        assert!(id_at < prio_at);
        assert!(text.contains("\"instructions\""));
    }
}
