//! bvc-openflow: OpenFlow flow-entry model for an SDN controller's REST API
//!
//! This crate provides:
//! - Match field groups (Ethernet, VLAN, IP, ICMP, MPLS/PBB, ARP, tunnel, metadata)
//! - The [`Match`] predicate aggregating them
//! - The action catalog and flow instructions
//! - [`FlowEntry`] with controller JSON decode, payload encode and a compact
//!   one-line summary
//!
//! Everything here is synchronous, in-memory transformation. Talking to a
//! controller lives in the `bvc-controller` crate.

pub mod action;
pub mod document;
pub mod error;
pub mod fields;
pub mod flow;
pub mod instruction;
pub mod matches;
pub mod naming;
mod summary;

pub use action::{Action, ActionKind, OutputAction, SetFieldAction};
pub use document::Document;
pub use error::{Error, Result};
pub use flow::{FlowDuration, FlowEntry, FlowStatistics, FLOW_PAYLOAD_KEY};
pub use instruction::{Instruction, InstructionKind, Instructions};
pub use matches::Match;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::action::{Action, ActionKind};
    pub use super::document::Document;
    pub use super::flow::FlowEntry;
    pub use super::instruction::Instruction;
    pub use super::matches::Match;
}
