//! Flow instructions
//!
//! An instruction is a mapping with an `order` and one kind key. The
//! apply-actions kind is the one the rest of this crate renders; go-to-table,
//! write-metadata, write-actions, clear-actions and meter are decoded and
//! re-encoded as well. Any other instruction element is logged and dropped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::action::{decode_actions, Action};
use crate::error::{Error, Result};

/// Kind keys recognized by the decoder
pub const INSTRUCTION_KEYS: [&str; 6] = [
    "apply_actions",
    "go_to_table",
    "write_metadata",
    "write_actions",
    "clear_actions",
    "meter",
];

/// The `instructions` container of a flow entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instructions {
    #[serde(default, deserialize_with = "instruction_list")]
    pub instruction: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub order: u32,
    #[serde(flatten)]
    pub kind: InstructionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    #[serde(rename = "apply_actions")]
    ApplyActions(ActionList),
    #[serde(rename = "go_to_table")]
    GotoTable(GotoTable),
    #[serde(rename = "write_metadata")]
    WriteMetadata(WriteMetadata),
    #[serde(rename = "write_actions")]
    WriteActions(ActionList),
    #[serde(rename = "clear_actions")]
    ClearActions {},
    #[serde(rename = "meter")]
    Meter(MeterInstruction),
}

/// Ordered action list, as held by apply-actions and write-actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionList {
    #[serde(default, deserialize_with = "action_list")]
    pub action: Vec<Action>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_mask: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterInstruction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_id: Option<u32>,
}

impl Instruction {
    /// Empty apply-actions instruction
    pub fn apply_actions(order: u32) -> Self {
        Self {
            order,
            kind: InstructionKind::ApplyActions(ActionList::default()),
        }
    }

    pub fn goto_table(order: u32, table_id: u8) -> Self {
        Self {
            order,
            kind: InstructionKind::GotoTable(GotoTable {
                table_id: Some(table_id),
            }),
        }
    }

    pub fn is_apply_actions(&self) -> bool {
        matches!(self.kind, InstructionKind::ApplyActions(_))
    }

    /// Actions of an apply-actions instruction, `None` for other kinds
    pub fn applied_actions(&self) -> Option<&[Action]> {
        match &self.kind {
            InstructionKind::ApplyActions(list) => Some(&list.action),
            _ => None,
        }
    }

    /// Append to an apply-actions instruction. Returns false and leaves the
    /// instruction untouched for other kinds.
    pub fn add_apply_action(&mut self, action: Action) -> bool {
        match &mut self.kind {
            InstructionKind::ApplyActions(list) => {
                list.action.push(action);
                true
            }
            _ => false,
        }
    }

    /// Decode one instruction element; `Ok(None)` when no kind is recognized
    pub fn from_document(doc: &Value) -> Result<Option<Self>> {
        let obj = doc
            .as_object()
            .ok_or_else(|| Error::type_mismatch("Instruction", "dict", doc))?;

        let Some(key) = INSTRUCTION_KEYS.iter().find(|key| obj.contains_key(**key)) else {
            warn!(
                "dropping unsupported instruction with keys {:?}",
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
        let kind = InstructionKind::deserialize(&Value::Object(tagged))?;

        Ok(Some(Self { order, kind }))
    }
}

impl Instructions {
    pub fn push(&mut self, instruction: Instruction) {
        self.instruction.push(instruction);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instruction.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.instruction.is_empty()
    }
}

fn action_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Action>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => decode_actions(&items).map_err(nested_error),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!("ignoring action list that is not a list: {}", other);
            Ok(Vec::new())
        }
    }
}

/// Re-raise a model error inside serde without repeating the JSON prefix
fn nested_error<E: serde::de::Error>(err: Error) -> E {
    match err {
        Error::Json(inner) => E::custom(inner),
        other => E::custom(other),
    }
}

fn instruction_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Instruction>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("ignoring instruction list that is not a list: {}", other);
            return Ok(Vec::new());
        }
    };

    let mut instructions = Vec::with_capacity(items.len());
    for item in &items {
        if !item.is_object() {
            warn!("skipping non-mapping instruction element: {}", item);
            continue;
        }
        if let Some(instruction) = Instruction::from_document(item).map_err(nested_error)? {
            instructions.push(instruction);
        }
    }
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_actions_encode() {
        let mut inst = Instruction::apply_actions(0);
        assert!(inst.add_apply_action(Action::output(0, "2", None)));
        let doc = serde_json::to_value(&inst).unwrap();
        assert_eq!(
            doc,
            json!({
                "order": 0,
                "apply_actions": {"action": [
                    {"order": 0, "output_action": {"output_node_connector": "2"}}
                ]}
            })
        );
    }

    #[test]
    fn test_add_to_non_apply_instruction_refused() {
        let mut inst = Instruction::goto_table(1, 2);
        assert!(!inst.add_apply_action(Action::drop(0)));
        assert!(inst.applied_actions().is_none());
    }

    #[test]
    fn test_decode_container() {
        let doc = json!({
            "instruction": [
                {"order": 0, "apply_actions": {"action": [
                    {"order": 1, "drop_action": {}},
                    {"order": 0, "pop_vlan_action": {}}
                ]}},
                {"order": 1, "go_to_table": {"table_id": 3}},
                {"order": 2, "experimenter": {"id": 1}}
            ]
        });
        let insts: Instructions = serde_json::from_value(doc).unwrap();
        assert_eq!(insts.instruction.len(), 2);

        let actions = insts.instruction[0].applied_actions().unwrap();
        // encoded order is kept, no re-sort by `order`
        assert_eq!(actions[0].order, 1);
        assert_eq!(actions[1].order, 0);
        assert_eq!(insts.instruction[1], Instruction::goto_table(1, 3));
    }

    #[test]
    fn test_go_to_table_encode() {
        let doc = serde_json::to_value(Instruction::goto_table(0, 2)).unwrap();
        assert_eq!(doc, json!({"order": 0, "go_to_table": {"table_id": 2}}));
    }

    #[test]
    fn test_nested_error_has_single_prefix() {
        let doc = json!({"instruction": [{"order": 0, "apply_actions": {"action": [
            {"order": 0, "output_action": {"output_node_connector": "1", "max_length": 70000}}
        ]}}]});
        let err = Instructions::deserialize(&doc).unwrap_err().to_string();
        assert!(err.contains("70000"), "{}", err);
        assert!(!err.contains("JSON error"), "{}", err);
    }

    #[test]
    fn test_missing_instruction_list_is_empty() {
        let insts: Instructions = serde_json::from_value(json!({})).unwrap();
        assert!(insts.is_empty());
    }

    #[test]
    fn test_rejects_non_mapping_element() {
        assert!(Instruction::from_document(&json!([1])).is_err());
    }
}
