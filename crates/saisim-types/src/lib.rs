//! Common saisim types shared by the forwarding engine, the attribute
//! store and the object handlers.
//!
//! - [`Oid`] and [`ObjectType`]: object identity as seen by SAI callers
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`IpPrefix`]: address/mask pairs as carried by route and ACL objects
//! - [`SaiError`]: the error taxonomy returned by every RPC

mod error;
mod ip;
mod mac;
mod oid;

pub use error::{Code, SaiError, SaiResult};
pub use ip::{ip_octets, IpPrefix};
pub use mac::MacAddress;
pub use oid::{ObjectType, Oid, NULL_OID};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("unknown object type: {0}")]
    InvalidObjectType(i32),
}
