//! Match field groups
//!
//! Small value records, one per OpenFlow match-field family. Each owns only
//! its own fields, decodes from a mapping fragment and ignores keys it does
//! not model.

pub mod ethernet;
pub mod icmp;
pub mod ip;
pub mod mpls;
pub mod tunnel;
pub mod vlan;

pub use ethernet::{EthernetMatch, EthernetType, HardwareAddress};
pub use icmp::{IcmpMatch, IcmpV6Match};
pub use ip::{IpMatch, Ipv6ExtHeader, Ipv6Label};
pub use mpls::{Pbb, ProtocolMatchFields};
pub use tunnel::{Metadata, Tunnel};
pub use vlan::{VlanId, VlanMatch};
