//! Flow entry decode/encode against controller-shaped documents

use bvc_openflow::prelude::*;
use bvc_openflow::FLOW_PAYLOAD_KEY;
use serde_json::{json, Value};

fn configured_flow() -> Value {
    json!({
        "id": "264",
        "table_id": 0,
        "flow-name": "vlan-retag",
        "priority": 1000,
        "cookie": 255,
        "cookie_mask": 255,
        "hard-timeout": 1200,
        "idle-timeout": 3400,
        "strict": false,
        "installHw": false,
        "barrier": false,
        "match": {
            "in-port": "openflow:1:1",
            "ethernet-match": {
                "ethernet-type": {"type": 33024},
                "ethernet-source": {"address": "00:00:00:00:23:AE"}
            },
            "vlan-match": {"vlan-id": {"vlan-id": 100, "vlan-id-present": true}, "vlan-pcp": 3}
        },
        "instructions": {
            "instruction": [{
                "order": 0,
                "apply-actions": {
                    "action": [
                        {"order": 2, "output-action": {"output-node-connector": "5", "max-length": 0}},
                        {"order": 1, "set-field": {"vlan-match": {"vlan-id": {"vlan-id": 200, "vlan-id-present": true}}}},
                        {"order": 0, "pop-vlan-action": {}}
                    ]
                }
            }]
        }
    })
}

#[test]
fn test_configured_flow_summary() {
    let flow = FlowEntry::from_document(&configured_flow()).unwrap();
    assert_eq!(
        flow.compact_summary(),
        "cookie=0xff,table=0,idle_timeout=3400,hard_timeout=1200,priority=1000 \
         matches={in_port=1,eth_type=0x8100,eth_src=00:00:00:00:23:ae,vlan_vid=100,vlan_pcp=3} \
         actions={pop_vlan,set_vlan_vid=200,output=5}"
    );
}

#[test]
fn test_payload_round_trip_keeps_present_fields() {
    let flow = FlowEntry::from_document(&configured_flow()).unwrap();
    let payload = flow.payload().unwrap();
    let body = &payload[FLOW_PAYLOAD_KEY];

    assert!(body.get("table_id").is_some());
    assert!(body.get("cookie_mask").is_some());
    assert!(body.get("flow-name").is_some());
    assert!(body.get("flow_name").is_none());
    assert!(body.get("opendaylight-flow-statistics:flow-statistics").is_none());

    let decoded = FlowEntry::from_document(body).unwrap();
    assert_eq!(decoded, flow);
    assert_eq!(decoded.payload().unwrap(), payload);
}

#[test]
fn test_json_text_and_document_decode_agree() {
    let doc = configured_flow();
    let text = serde_json::to_string(&doc).unwrap();
    let from_text = FlowEntry::decode(Some(text.as_str()), None).unwrap();
    let from_doc = FlowEntry::decode(None, Some(&doc)).unwrap();
    assert_eq!(from_text, from_doc);
}

#[test]
fn test_builder_flow_payload() {
    let mut flow = FlowEntry::new();
    flow.set_flow_id("11");
    flow.set_table_id(0);
    flow.set_priority(1000);

    let mut m = Match::new();
    m.set_eth_type(0x0800);
    m.set_ip_proto(6);
    m.set_tcp_dst_port(22);
    flow.add_match(m).unwrap();

    let mut inst = Instruction::apply_actions(0);
    inst.add_apply_action(Action::output(0, "CONTROLLER", Some(65535)));
    flow.add_instruction(inst);

    let payload = flow.payload().unwrap();
    assert_eq!(
        payload,
        json!({
            "flow-node-inventory:flow": {
                "id": "11",
                "table_id": 0,
                "priority": 1000,
                "match": {
                    "ethernet-match": {"ethernet-type": {"type": 2048}},
                    "ip-match": {"ip-protocol": 6},
                    "tcp-destination-port": 22
                },
                "instructions": {"instruction": [{
                    "order": 0,
                    "apply-actions": {"action": [{
                        "order": 0,
                        "output-action": {"output-node-connector": "CONTROLLER", "max-length": 65535}
                    }]}
                }]}
            }
        })
    );
}

#[test]
fn test_unrecognized_action_does_not_fail_decode() {
    let mut doc = configured_flow();
    doc["instructions"]["instruction"][0]["apply-actions"]["action"]
        .as_array_mut()
        .unwrap()
        .push(json!({"order": 3, "vendor-magic-action": {"x": 1}}));

    let flow = FlowEntry::from_document(&doc).unwrap();
    let actions = flow.instructions()[0].applied_actions().unwrap();
    assert_eq!(actions.len(), 3);
    assert_eq!(actions.iter().map(|a| a.order).collect::<Vec<_>>(), vec![2, 1, 0]);
}
