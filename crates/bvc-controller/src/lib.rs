//! bvc-controller: switch facade over an SDN controller's RESTCONF API
//!
//! This crate provides:
//! - The [`Controller`] capability (GET/PUT/DELETE plus inventory URLs)
//! - [`OfSwitch`] for switch inventory queries and flow-table CRUD
//! - Operation status types ([`Status`], [`OperStatus`], [`Outcome`])
//! - Controller settings loaded from file and environment
//!
//! The HTTP transport itself is supplied by the caller.

pub mod config;
pub mod controller;
pub mod error;
pub mod inventory;
pub mod ofswitch;
pub mod status;

pub use config::{BvcConfig, ControllerConfig};
pub use controller::{Controller, HttpResponse, InventoryUrls, YANG_JSON};
pub use error::{Error, Result};
pub use ofswitch::{FlowDeletion, OfSwitch, PortBrief, SwitchFeatures, SwitchInfo};
pub use status::{OperStatus, Outcome, Status};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::controller::{Controller, HttpResponse, InventoryUrls};
    pub use super::ofswitch::OfSwitch;
    pub use super::status::{OperStatus, Outcome, Status};
}
