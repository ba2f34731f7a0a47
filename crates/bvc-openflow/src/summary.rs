//! One-line flow rendering in the style of `ovs-ofctl dump-flows`
//!
//! ```text
//! cookie=0x2a,duration=5.5s,table=0,n_packets=12,n_bytes=1176,priority=2 matches={in_port=2,eth_type=0x800} actions={pop_vlan,output=3}
//! ```
//!
//! Each group lists only the fields that are present, in a fixed order.
//! Actions are grouped by category (pop MPLS, push MPLS, pop VLAN, push
//! VLAN, set-field, drop, output) regardless of their `order` values.

use std::fmt::Display;

use crate::action::ActionKind;
use crate::flow::FlowEntry;
use crate::matches::Match;

impl FlowEntry {
    /// Compact `key=value` rendering of counters, match and actions
    pub fn compact_summary(&self) -> String {
        format!(
            "{} {} {}",
            self.summary_header(),
            summary_matches(self.match_fields()),
            self.summary_actions()
        )
    }

    fn summary_header(&self) -> String {
        let mut parts = Vec::new();
        if let Some(cookie) = self.cookie() {
            parts.push(format!("cookie={:#x}", cookie));
        }
        if let Some(duration) = self.duration() {
            parts.push(format!("duration={}s", float_repr(duration)));
        }
        push_field(&mut parts, "table", self.table_id());
        push_field(&mut parts, "n_packets", self.packet_count());
        push_field(&mut parts, "n_bytes", self.byte_count());
        push_field(&mut parts, "idle_timeout", self.idle_timeout());
        push_field(&mut parts, "hard_timeout", self.hard_timeout());
        push_field(&mut parts, "priority", self.priority());
        parts.join(",")
    }

    fn summary_actions(&self) -> String {
        let mut pop_mpls = Vec::new();
        let mut push_mpls = Vec::new();
        let mut pop_vlan = Vec::new();
        let mut push_vlan = Vec::new();
        let mut set_field = Vec::new();
        let mut drop = Vec::new();
        let mut output = Vec::new();

        let applied = self
            .instructions()
            .iter()
            .filter_map(|inst| inst.applied_actions())
            .flatten();

        for action in applied {
            match &action.kind {
                ActionKind::Output(out) => {
                    let mut s = format!("output={}", out.port().unwrap_or("None"));
                    if let Some(max_len) = out.max_len() {
                        s.push_str(&format!(":{}", max_len));
                    }
                    output.push(s);
                }
                ActionKind::PushVlan(push) => {
                    push_vlan.push(format!("push_vlan={}", hex_or_none(push.ethernet_type)));
                }
                ActionKind::PopVlan {} => pop_vlan.push("pop_vlan".to_string()),
                ActionKind::PushMpls(push) => {
                    push_mpls.push(format!("push_mpls={}", hex_or_none(push.ethernet_type)));
                }
                ActionKind::PopMpls(_) => pop_mpls.push("pop_mpls".to_string()),
                ActionKind::SetField(sf) => {
                    if let Some(label) = sf.mpls_label() {
                        set_field.push(format!("set_mpls_label={}", label));
                    }
                    if let Some(vid) = sf.vlan_id() {
                        set_field.push(format!("set_vlan_vid={}", vid));
                    }
                }
                ActionKind::Drop {} => drop.push("drop".to_string()),
                _ => {}
            }
        }

        let ordered: Vec<String> = [pop_mpls, push_mpls, pop_vlan, push_vlan, set_field, drop, output]
            .into_iter()
            .flatten()
            .collect();
        format!("actions={{{}}}", ordered.join(","))
    }
}

fn summary_matches(m: Option<&Match>) -> String {
    let Some(m) = m else {
        return "matches={}".to_string();
    };

    let mut parts = Vec::new();
    push_field(&mut parts, "in_port", m.in_port());
    if let Some(eth_type) = m.eth_type() {
        parts.push(format!("eth_type={:#x}", eth_type));
    }
    push_field(&mut parts, "eth_src", m.eth_src());
    push_field(&mut parts, "eth_dst", m.eth_dst());
    push_field(&mut parts, "vlan_vid", m.vlan_id());
    push_field(&mut parts, "vlan_pcp", m.vlan_pcp());
    push_field(&mut parts, "ip_proto", m.ip_proto());
    push_field(&mut parts, "ip_dscp", m.ip_dscp());
    push_field(&mut parts, "ip_ecn", m.ip_ecn());
    push_field(&mut parts, "icmpv4_type", m.icmpv4_type());
    push_field(&mut parts, "icmpv4_code", m.icmpv4_code());
    push_field(&mut parts, "icmpv6_type", m.icmpv6_type());
    push_field(&mut parts, "icmpv6_code", m.icmpv6_code());
    push_field(&mut parts, "ipv4_src", m.ipv4_src());
    push_field(&mut parts, "ipv4_dst", m.ipv4_dst());
    push_field(&mut parts, "ipv6_src", m.ipv6_src());
    push_field(&mut parts, "ipv6_dst", m.ipv6_dst());
    push_field(&mut parts, "ipv6_flabel", m.ipv6_flabel());
    push_field(&mut parts, "ipv6_exthdr", m.ipv6_exh_hdr());
    push_field(&mut parts, "udp_src", m.udp_src_port());
    push_field(&mut parts, "udp_dst", m.udp_dst_port());
    push_field(&mut parts, "tcp_src", m.tcp_src_port());
    push_field(&mut parts, "tcp_dst", m.tcp_dst_port());
    push_field(&mut parts, "sctp_src", m.sctp_src_port());
    push_field(&mut parts, "sctp_dst", m.sctp_dst_port());
    push_field(&mut parts, "arp_op", m.arp_opcode());
    push_field(&mut parts, "arp_spa", m.arp_src_transport_address());
    push_field(&mut parts, "arp_tpa", m.arp_tgt_transport_address());
    push_field(&mut parts, "arp_sha", m.arp_src_hw_address());
    push_field(&mut parts, "arp_tha", m.arp_tgt_hw_address());
    push_field(&mut parts, "mpls_label", m.mpls_label());
    push_field(&mut parts, "mpls_tc", m.mpls_tc());
    push_field(&mut parts, "mpls_bos", m.mpls_bos());
    push_field(&mut parts, "tunnel_id", m.tunnel_id());
    push_field(&mut parts, "metadata", m.metadata());

    // values are emitted without spaces, quotes or braces
    let body: String = parts
        .join(",")
        .chars()
        .filter(|c| !matches!(c, ' ' | '{' | '}' | '"'))
        .collect();
    format!("matches={{{}}}", body)
}

fn push_field<T: Display>(parts: &mut Vec<String>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        parts.push(format!("{}={}", key, v));
    }
}

fn hex_or_none(value: Option<u16>) -> String {
    value.map_or_else(|| "None".to_string(), |v| format!("{:#x}", v))
}

/// Float text that always carries a fractional part (`5.0`, `5.5`)
fn float_repr(value: f64) -> String {
    let s = value.to_string();
    if s.contains(|c: char| matches!(c, '.' | 'e' | 'E')) || !value.is_finite() {
        s
    } else {
        format!("{}.0", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::document::Document;
    use crate::instruction::Instruction;
    use serde_json::json;

    #[test]
    fn test_action_precedence_ignores_order() {
        let mut flow = FlowEntry::new();
        let mut inst = Instruction::apply_actions(0);
        inst.add_apply_action(Action::output(0, "3", None));
        inst.add_apply_action(Action::pop_vlan(1));
        flow.add_instruction(inst);

        assert!(flow.compact_summary().ends_with("actions={pop_vlan,output=3}"));
    }

    #[test]
    fn test_full_precedence() {
        let mut flow = FlowEntry::new();
        let mut inst = Instruction::apply_actions(0);
        inst.add_apply_action(Action::output(0, "1", Some(128)));
        inst.add_apply_action(Action::drop(1));
        inst.add_apply_action(Action::set_vlan_id(2, 10));
        inst.add_apply_action(Action::push_vlan(3, 0x8100));
        inst.add_apply_action(Action::push_mpls(4, 0x8847));
        inst.add_apply_action(Action::pop_mpls(5, 0x0800));
        flow.add_instruction(inst);

        assert_eq!(
            flow.summary_actions(),
            "actions={pop_mpls,push_mpls=0x8847,push_vlan=0x8100,set_vlan_vid=10,drop,output=1:128}"
        );
    }

    #[test]
    fn test_header_fields() {
        let flow = FlowEntry::from_document(&json!({
            "cookie": 42,
            "table_id": 0,
            "priority": 2,
            "idle_timeout": 0,
            "flow_statistics": {
                "packet_count": 12,
                "byte_count": 1176,
                "duration": {"second": 5, "nanosecond": 0}
            }
        }))
        .unwrap();
        assert_eq!(
            flow.summary_header(),
            "cookie=0x2a,duration=5.0s,table=0,n_packets=12,n_bytes=1176,idle_timeout=0,priority=2"
        );
    }

    #[test]
    fn test_no_match_renders_empty_group() {
        let flow = FlowEntry::new();
        assert_eq!(flow.compact_summary(), " matches={} actions={}");
    }

    #[test]
    fn test_match_group_order() {
        let mut m = Match::new();
        m.set_tcp_dst_port(80);
        m.set_in_port("openflow:1:1");
        m.set_eth_type(0x0800);
        m.set_eth_src("00:00:00:00:00:AA");
        m.set_ip_proto(6);
        m.set_ipv4_dst("10.0.0.2/32");
        m.set_arp_tgt_hw_address("00:00:00:00:00:02");
        assert_eq!(
            summary_matches(Some(&m)),
            "matches={in_port=1,eth_type=0x800,eth_src=00:00:00:00:00:aa,ip_proto=6,\
             ipv4_dst=10.0.0.2/32,tcp_dst=80,arp_tha=00:00:00:00:00:02}"
        );
    }

    #[test]
    fn test_float_repr() {
        assert_eq!(float_repr(5.5), "5.5");
        assert_eq!(float_repr(5.0), "5.0");
        assert_eq!(float_repr(0.000123), "0.000123");
    }
}
