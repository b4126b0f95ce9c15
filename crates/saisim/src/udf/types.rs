use saisim_attrs::{attr_enum, attribute_message, AclField};
use saisim_fwd::HeaderId;

attr_enum! {
    pub enum UdfBase {
        L2 = 0,
        L3 = 1,
        L4 = 2,
    }
}

impl UdfBase {
    pub fn header(&self) -> HeaderId {
        match self {
            UdfBase::L2 => HeaderId::L2,
            UdfBase::L3 => HeaderId::L3,
            UdfBase::L4 => HeaderId::L4,
        }
    }
}

attribute_message! {
    /// SAI_UDF_ATTR_*.
    pub struct UdfAttrs for Udf {
        MATCH_ID = 1 => match_id: u64,
        GROUP_ID = 2 => group_id: u64,
        BASE = 3 => base: UdfBase,
        OFFSET = 4 => offset: u16,
        HASH_MASK = 5 => hash_mask: Vec<u8>,
    }
}

attr_enum! {
    pub enum UdfGroupType {
        Generic = 0,
        Hash = 1,
    }
}

attribute_message! {
    /// SAI_UDF_GROUP_ATTR_*.
    pub struct UdfGroupAttrs for UdfGroup {
        UDF_LIST = 1 => udf_list: Vec<u64>,
        TYPE = 2 => group_type: UdfGroupType,
        LENGTH = 3 => length: u16,
    }
}

attribute_message! {
    /// SAI_UDF_MATCH_ATTR_*.
    pub struct UdfMatchAttrs for UdfMatch {
        L2_TYPE = 1 => l2_type: AclField,
        L3_TYPE = 2 => l3_type: AclField,
        GRE_TYPE = 3 => gre_type: AclField,
        PRIORITY = 4 => priority: u8,
    }
}
