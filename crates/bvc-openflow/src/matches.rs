//! The match predicate of a flow entry
//!
//! A sparse record: each sub-group is present only when the rule
//! constrains that dimension, absence meaning wildcard. Setters allocate
//! the owning sub-group on first write. Keys the model does not know are
//! kept aside and written back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{string_or_number, Document};
use crate::fields::{
    EthernetMatch, HardwareAddress, IcmpMatch, IcmpV6Match, IpMatch, Ipv6ExtHeader, Ipv6Label,
    Metadata, ProtocolMatchFields, Tunnel, VlanMatch,
};

/// OpenFlow match fields for one flow entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Ingress port, as the controller encodes it (`"openflow:1:3"`)
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub in_port: Option<String>,
    /// Underlying physical port when the packet arrived on a logical port
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub in_phy_port: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_match: Option<EthernetMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_match: Option<VlanMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_match: Option<IpMatch>,

    /// IPv4 source, optionally with prefix length (`"10.0.0.1/32"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_source: Option<String>,
    /// IPv4 destination, optionally with prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_destination: Option<String>,
    /// Target address in an IPv6 Neighbor Discovery message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_nd_target: Option<String>,
    /// Source link-layer address option in an IPv6 ND message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_nd_sll: Option<String>,
    /// Target link-layer address option in an IPv6 ND message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_nd_tll: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_label: Option<Ipv6Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_ext_header: Option<Ipv6ExtHeader>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_match_fields: Option<ProtocolMatchFields>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_source_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_destination_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_source_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_destination_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sctp_source_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sctp_destination_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmpv4_match: Option<IcmpMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmpv6_match: Option<IcmpV6Match>,

    /// ARP opcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp_op: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp_source_transport_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp_target_transport_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp_source_hardware_address: Option<HardwareAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp_target_hardware_address: Option<HardwareAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<Tunnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Keys this model does not recognize
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Document for Match {
    const NAME: &'static str = "Match";
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys carried through from the decoded document without a typed field
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    // ========================================================================
    // Ports
    // ========================================================================

    pub fn set_in_port(&mut self, port: impl Into<String>) {
        self.in_port = Some(port.into());
    }

    /// Ingress port with any `node:` qualifiers removed (`"openflow:1:7"` -> `"7"`)
    pub fn in_port(&self) -> Option<&str> {
        self.in_port
            .as_deref()
            .map(|p| p.rsplit_once(':').map_or(p, |(_, port)| port))
    }

    pub fn set_in_phy_port(&mut self, port: impl Into<String>) {
        self.in_phy_port = Some(port.into());
    }

    pub fn in_phy_port(&self) -> Option<&str> {
        self.in_phy_port.as_deref()
    }

    // ========================================================================
    // Ethernet
    // ========================================================================

    pub fn set_eth_type(&mut self, eth_type: u16) {
        self.ethernet_match
            .get_or_insert_with(Default::default)
            .set_type(eth_type);
    }

    pub fn eth_type(&self) -> Option<u16> {
        self.ethernet_match.as_ref().and_then(EthernetMatch::eth_type)
    }

    pub fn set_eth_src(&mut self, address: impl Into<String>) {
        self.ethernet_match
            .get_or_insert_with(Default::default)
            .set_src(address);
    }

    /// Source MAC, lower-cased
    pub fn eth_src(&self) -> Option<String> {
        self.ethernet_match
            .as_ref()
            .and_then(EthernetMatch::src)
            .map(str::to_lowercase)
    }

    pub fn set_eth_dst(&mut self, address: impl Into<String>) {
        self.ethernet_match
            .get_or_insert_with(Default::default)
            .set_dst(address);
    }

    /// Destination MAC, lower-cased
    pub fn eth_dst(&self) -> Option<String> {
        self.ethernet_match
            .as_ref()
            .and_then(EthernetMatch::dst)
            .map(str::to_lowercase)
    }

    // ========================================================================
    // VLAN
    // ========================================================================

    pub fn set_vlan_id(&mut self, vid: u16) {
        self.vlan_match.get_or_insert_with(Default::default).set_vid(vid);
    }

    pub fn vlan_id(&self) -> Option<u16> {
        self.vlan_match.as_ref().and_then(VlanMatch::vid)
    }

    pub fn set_vlan_pcp(&mut self, pcp: u8) {
        self.vlan_match.get_or_insert_with(Default::default).set_pcp(pcp);
    }

    pub fn vlan_pcp(&self) -> Option<u8> {
        self.vlan_match.as_ref().and_then(VlanMatch::pcp)
    }

    // ========================================================================
    // IP
    // ========================================================================

    pub fn set_ip_dscp(&mut self, dscp: u8) {
        self.ip_match.get_or_insert_with(Default::default).ip_dscp = Some(dscp);
    }

    pub fn ip_dscp(&self) -> Option<u8> {
        self.ip_match.as_ref().and_then(|m| m.ip_dscp)
    }

    pub fn set_ip_ecn(&mut self, ecn: u8) {
        self.ip_match.get_or_insert_with(Default::default).ip_ecn = Some(ecn);
    }

    pub fn ip_ecn(&self) -> Option<u8> {
        self.ip_match.as_ref().and_then(|m| m.ip_ecn)
    }

    pub fn set_ip_proto(&mut self, proto: u8) {
        self.ip_match.get_or_insert_with(Default::default).ip_protocol = Some(proto);
    }

    pub fn ip_proto(&self) -> Option<u8> {
        self.ip_match.as_ref().and_then(|m| m.ip_protocol)
    }

    pub fn set_ipv4_src(&mut self, addr: impl Into<String>) {
        self.ipv4_source = Some(addr.into());
    }

    pub fn ipv4_src(&self) -> Option<&str> {
        self.ipv4_source.as_deref()
    }

    pub fn set_ipv4_dst(&mut self, addr: impl Into<String>) {
        self.ipv4_destination = Some(addr.into());
    }

    pub fn ipv4_dst(&self) -> Option<&str> {
        self.ipv4_destination.as_deref()
    }

    pub fn set_ipv6_src(&mut self, addr: impl Into<String>) {
        self.ipv6_source = Some(addr.into());
    }

    pub fn ipv6_src(&self) -> Option<&str> {
        self.ipv6_source.as_deref()
    }

    pub fn set_ipv6_dst(&mut self, addr: impl Into<String>) {
        self.ipv6_destination = Some(addr.into());
    }

    pub fn ipv6_dst(&self) -> Option<&str> {
        self.ipv6_destination.as_deref()
    }

    pub fn set_ipv6_nd_target(&mut self, addr: impl Into<String>) {
        self.ipv6_nd_target = Some(addr.into());
    }

    pub fn ipv6_nd_target(&self) -> Option<&str> {
        self.ipv6_nd_target.as_deref()
    }

    pub fn set_ipv6_nd_sll(&mut self, addr: impl Into<String>) {
        self.ipv6_nd_sll = Some(addr.into());
    }

    pub fn ipv6_nd_sll(&self) -> Option<&str> {
        self.ipv6_nd_sll.as_deref()
    }

    pub fn set_ipv6_nd_tll(&mut self, addr: impl Into<String>) {
        self.ipv6_nd_tll = Some(addr.into());
    }

    pub fn ipv6_nd_tll(&self) -> Option<&str> {
        self.ipv6_nd_tll.as_deref()
    }

    /// Set the IPv6 flow label; any previous mask is cleared
    pub fn set_ipv6_flabel(&mut self, flabel: u32) {
        self.ipv6_label.get_or_insert_with(Default::default).set(flabel, None);
    }

    pub fn set_ipv6_flabel_masked(&mut self, flabel: u32, mask: u32) {
        self.ipv6_label.get_or_insert_with(Default::default).set(flabel, Some(mask));
    }

    pub fn ipv6_flabel(&self) -> Option<u32> {
        self.ipv6_label.as_ref().and_then(|l| l.ipv6_flabel)
    }

    /// Set the IPv6 extension header bitmap; any previous mask is cleared
    pub fn set_ipv6_exh_hdr(&mut self, exthdr: u16) {
        self.ipv6_ext_header.get_or_insert_with(Default::default).set(exthdr, None);
    }

    pub fn set_ipv6_exh_hdr_masked(&mut self, exthdr: u16, mask: u16) {
        self.ipv6_ext_header
            .get_or_insert_with(Default::default)
            .set(exthdr, Some(mask));
    }

    pub fn ipv6_exh_hdr(&self) -> Option<u16> {
        self.ipv6_ext_header.as_ref().and_then(|h| h.ipv6_exthdr)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn set_udp_src_port(&mut self, port: u16) {
        self.udp_source_port = Some(port);
    }

    pub fn udp_src_port(&self) -> Option<u16> {
        self.udp_source_port
    }

    pub fn set_udp_dst_port(&mut self, port: u16) {
        self.udp_destination_port = Some(port);
    }

    pub fn udp_dst_port(&self) -> Option<u16> {
        self.udp_destination_port
    }

    pub fn set_tcp_src_port(&mut self, port: u16) {
        self.tcp_source_port = Some(port);
    }

    pub fn tcp_src_port(&self) -> Option<u16> {
        self.tcp_source_port
    }

    pub fn set_tcp_dst_port(&mut self, port: u16) {
        self.tcp_destination_port = Some(port);
    }

    pub fn tcp_dst_port(&self) -> Option<u16> {
        self.tcp_destination_port
    }

    pub fn set_sctp_src_port(&mut self, port: u16) {
        self.sctp_source_port = Some(port);
    }

    pub fn sctp_src_port(&self) -> Option<u16> {
        self.sctp_source_port
    }

    pub fn set_sctp_dst_port(&mut self, port: u16) {
        self.sctp_destination_port = Some(port);
    }

    pub fn sctp_dst_port(&self) -> Option<u16> {
        self.sctp_destination_port
    }

    // ========================================================================
    // ICMP
    // ========================================================================

    pub fn set_icmpv4_type(&mut self, icmp_type: u8) {
        self.icmpv4_match.get_or_insert_with(Default::default).icmpv4_type = Some(icmp_type);
    }

    pub fn icmpv4_type(&self) -> Option<u8> {
        self.icmpv4_match.as_ref().and_then(|m| m.icmpv4_type)
    }

    pub fn set_icmpv4_code(&mut self, code: u8) {
        self.icmpv4_match.get_or_insert_with(Default::default).icmpv4_code = Some(code);
    }

    pub fn icmpv4_code(&self) -> Option<u8> {
        self.icmpv4_match.as_ref().and_then(|m| m.icmpv4_code)
    }

    pub fn set_icmpv6_type(&mut self, icmp_type: u8) {
        self.icmpv6_match.get_or_insert_with(Default::default).icmpv6_type = Some(icmp_type);
    }

    pub fn icmpv6_type(&self) -> Option<u8> {
        self.icmpv6_match.as_ref().and_then(|m| m.icmpv6_type)
    }

    pub fn set_icmpv6_code(&mut self, code: u8) {
        self.icmpv6_match.get_or_insert_with(Default::default).icmpv6_code = Some(code);
    }

    pub fn icmpv6_code(&self) -> Option<u8> {
        self.icmpv6_match.as_ref().and_then(|m| m.icmpv6_code)
    }

    // ========================================================================
    // ARP
    // ========================================================================

    pub fn set_arp_opcode(&mut self, opcode: u16) {
        self.arp_op = Some(opcode);
    }

    pub fn arp_opcode(&self) -> Option<u16> {
        self.arp_op
    }

    pub fn set_arp_src_transport_address(&mut self, addr: impl Into<String>) {
        self.arp_source_transport_address = Some(addr.into());
    }

    pub fn arp_src_transport_address(&self) -> Option<&str> {
        self.arp_source_transport_address.as_deref()
    }

    pub fn set_arp_tgt_transport_address(&mut self, addr: impl Into<String>) {
        self.arp_target_transport_address = Some(addr.into());
    }

    pub fn arp_tgt_transport_address(&self) -> Option<&str> {
        self.arp_target_transport_address.as_deref()
    }

    pub fn set_arp_src_hw_address(&mut self, addr: impl Into<String>) {
        self.arp_source_hardware_address = Some(HardwareAddress::new(addr));
    }

    pub fn arp_src_hw_address(&self) -> Option<&str> {
        self.arp_source_hardware_address
            .as_ref()
            .and_then(|a| a.address.as_deref())
    }

    pub fn set_arp_tgt_hw_address(&mut self, addr: impl Into<String>) {
        self.arp_target_hardware_address = Some(HardwareAddress::new(addr));
    }

    pub fn arp_tgt_hw_address(&self) -> Option<&str> {
        self.arp_target_hardware_address
            .as_ref()
            .and_then(|a| a.address.as_deref())
    }

    // ========================================================================
    // MPLS / PBB
    // ========================================================================

    pub fn set_mpls_label(&mut self, label: u32) {
        self.protocol_match_fields.get_or_insert_with(Default::default).mpls_label = Some(label);
    }

    pub fn mpls_label(&self) -> Option<u32> {
        self.protocol_match_fields.as_ref().and_then(|p| p.mpls_label)
    }

    pub fn set_mpls_tc(&mut self, tc: u8) {
        self.protocol_match_fields.get_or_insert_with(Default::default).mpls_tc = Some(tc);
    }

    pub fn mpls_tc(&self) -> Option<u8> {
        self.protocol_match_fields.as_ref().and_then(|p| p.mpls_tc)
    }

    pub fn set_mpls_bos(&mut self, bos: u8) {
        self.protocol_match_fields.get_or_insert_with(Default::default).mpls_bos = Some(bos);
    }

    pub fn mpls_bos(&self) -> Option<u8> {
        self.protocol_match_fields.as_ref().and_then(|p| p.mpls_bos)
    }

    pub fn set_pbb_isid(&mut self, isid: u32, mask: Option<u32>) {
        self.protocol_match_fields
            .get_or_insert_with(Default::default)
            .set_pbb_isid(isid, mask);
    }

    pub fn pbb_isid(&self) -> Option<u32> {
        self.protocol_match_fields
            .as_ref()
            .and_then(ProtocolMatchFields::pbb_isid)
    }

    // ========================================================================
    // Tunnel / Metadata
    // ========================================================================

    pub fn set_tunnel_id(&mut self, tunnel_id: u64) {
        self.tunnel.get_or_insert_with(Default::default).tunnel_id = Some(tunnel_id);
    }

    pub fn tunnel_id(&self) -> Option<u64> {
        self.tunnel.as_ref().and_then(|t| t.tunnel_id)
    }

    pub fn set_metadata(&mut self, metadata: u64) {
        self.metadata.get_or_insert_with(Default::default).metadata = Some(metadata);
    }

    pub fn metadata(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.metadata)
    }

    pub fn set_metadata_mask(&mut self, mask: u64) {
        self.metadata.get_or_insert_with(Default::default).metadata_mask = Some(mask);
    }

    pub fn metadata_mask(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.metadata_mask)
    }
}
