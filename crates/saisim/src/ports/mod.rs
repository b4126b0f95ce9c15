//! PortsOrch - ports, queues, scheduler groups and LAGs.
//!
//! Ports are bound to host network devices by a configurable naming
//! scheme. Queues and scheduler groups are plain stored objects whose OIDs
//! are allocated together with their port.

mod lag;
pub mod naming;
mod orch;
mod types;

pub use lag::LagOrch;
pub use naming::{HostDevices, StaticDevices, SysfsDevices};
pub use orch::{PortQos, PortsOrch};
pub use types::{
    LagAttrs, LagMemberAttrs, PortAttrs, PortFecMode, PortOperStatus, PortType, QueueAttrs,
    QueueType, SchedulerGroupAttrs,
};
