//! Enumerations and encodings shared by several object families.

use saisim_attrs::AttributeMessage;
use saisim_types::{Oid, SaiResult};

saisim_attrs::attr_enum! {
    /// What to do with packets hitting a route, neighbor, trap or ACL entry.
    pub enum PacketAction {
        Drop = 0,
        Forward = 1,
        Copy = 2,
        CopyCancel = 3,
        Trap = 4,
        Log = 5,
        Deny = 6,
        Transit = 7,
    }
}

impl PacketAction {
    /// Actions that keep a packet out of the forwarding path.
    pub fn is_drop_like(&self) -> bool {
        matches!(self, PacketAction::Drop | PacketAction::Trap | PacketAction::Deny)
    }
}

/// Name under which an object is known to the forwarding engine.
pub fn engine_id(oid: Oid) -> String {
    format!("{:#x}", oid)
}

/// OIDs travel through packet metadata as 8 big-endian bytes.
pub fn oid_bytes(oid: Oid) -> Vec<u8> {
    oid.to_be_bytes().to_vec()
}

pub fn u16_bytes(value: u16) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

pub fn u32_bytes(value: u32) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Overlays every present field of `update` onto `base`.
pub fn merge_attrs<M: AttributeMessage>(base: &mut M, update: &M) -> SaiResult<()> {
    for (id, value) in update.attributes() {
        base.set_attribute(id, &value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encodings() {
        assert_eq!(engine_id(0x2a), "0x2a");
        assert_eq!(oid_bytes(1), vec![0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(u16_bytes(0x0806), vec![0x08, 0x06]);
    }

    #[test]
    fn test_drop_like() {
        assert!(PacketAction::Trap.is_drop_like());
        assert!(!PacketAction::Copy.is_drop_like());
        assert!(!PacketAction::Forward.is_drop_like());
    }
}
