//! Table, entry and action model of the forwarding engine.

/// Per-packet fields and metadata the pipeline can match on or rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PacketField {
    EthernetMacSrc,
    EthernetMacDst,
    EthernetType,
    EthernetVlanTag,
    IpVersion,
    IpAddrSrc,
    IpAddrDst,
    IpProto,
    IpQos,
    IpHop,
    L4PortSrc,
    L4PortDst,
    IcmpType,
    IcmpCode,
    // Metadata carried between tables.
    PacketPortInput,
    PacketPortOutput,
    PacketVrf,
    PacketNextHopId,
    PacketNextHopGroupId,
    PacketNextHopIp,
    PacketInputIface,
    PacketOutputIface,
    PacketTrapId,
    PacketL2mcGroupId,
    PacketTunnelId,
    PacketVlanId,
}

/// Header an offset-based byte match is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderId {
    L2,
    L3,
    L4,
    Gre,
    Ipv4,
    Ipv6,
}

/// Identifies what a match or rewrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Packet {
        field: PacketField,
        instance: u32,
    },
    Bytes {
        header: HeaderId,
        instance: u32,
        offset: u32,
        size: u32,
    },
}

impl FieldId {
    pub const fn packet(field: PacketField) -> Self {
        FieldId::Packet { field, instance: 0 }
    }

    pub const fn bytes(header: HeaderId, offset: u32, size: u32) -> Self {
        FieldId::Bytes {
            header,
            instance: 0,
            offset,
            size,
        }
    }
}

impl From<PacketField> for FieldId {
    fn from(field: PacketField) -> Self {
        FieldId::packet(field)
    }
}

/// A single match criterion: field value plus mask of the same length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchField {
    pub field: FieldId,
    pub bytes: Vec<u8>,
    pub masks: Vec<u8>,
}

impl MatchField {
    /// Exact match: every bit of `bytes` is significant.
    pub fn exact(field: impl Into<FieldId>, bytes: Vec<u8>) -> Self {
        let masks = vec![0xff; bytes.len()];
        Self {
            field: field.into(),
            bytes,
            masks,
        }
    }

    pub fn masked(field: impl Into<FieldId>, bytes: Vec<u8>, masks: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            bytes,
            masks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Crc32,
}

/// One weighted branch of a select action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedActions {
    pub weight: u32,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Drop,
    /// Proceed to the next entry of an action table.
    Continue,
    /// Emit on the port selected by `PacketPortOutput`.
    Output,
    /// Send out of `port`; `immediate` skips the remaining pipeline.
    Transmit {
        port: String,
        immediate: bool,
    },
    SetField {
        field: FieldId,
        value: Vec<u8>,
    },
    CopyField {
        field: FieldId,
        src: FieldId,
    },
    Lookup {
        table: String,
    },
    Encap {
        header: HeaderId,
    },
    Decap {
        header: HeaderId,
    },
    FlowCounter {
        counter: String,
    },
    Policer {
        policer: String,
    },
    Select {
        algorithm: HashAlgorithm,
        hash_fields: Vec<FieldId>,
        lists: Vec<WeightedActions>,
    },
}

impl Action {
    pub fn set(field: PacketField, value: Vec<u8>) -> Self {
        Action::SetField {
            field: FieldId::packet(field),
            value,
        }
    }

    pub fn copy(field: PacketField, src: PacketField) -> Self {
        Action::CopyField {
            field: FieldId::packet(field),
            src: FieldId::packet(src),
        }
    }

    pub fn lookup(table: impl Into<String>) -> Self {
        Action::Lookup {
            table: table.into(),
        }
    }
}

/// Matching discipline of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKind {
    /// Exact match on the listed fields.
    Exact { key: Vec<FieldId> },
    /// Longest-prefix match; the last key field carries the prefix.
    Prefix { key: Vec<FieldId> },
    /// Masked, prioritized match split into independent banks.
    Flow { banks: u32 },
    /// Ordered list of action sets executed in sequence.
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDesc {
    pub id: String,
    pub kind: TableKind,
    /// Executed on a lookup miss.
    pub default_actions: Vec<Action>,
    pub size: u32,
}

impl TableDesc {
    pub fn new(id: impl Into<String>, kind: TableKind) -> Self {
        Self {
            id: id.into(),
            kind,
            default_actions: Vec::new(),
            size: 1024,
        }
    }

    pub fn with_default(mut self, actions: Vec<Action>) -> Self {
        self.default_actions = actions;
        self
    }
}

/// Identity of an entry within its table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    Exact(Vec<MatchField>),
    Prefix(Vec<MatchField>),
    Flow {
        priority: u32,
        bank: u32,
        fields: Vec<MatchField>,
    },
    /// Position within an action table.
    Action { id: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: EntryKey,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortKind {
    /// Host network device.
    Kernel { device: String },
    /// Tap device owned by the engine.
    Tap { device: String },
    Cpu,
    /// Placeholder for a port whose device is missing.
    Fake,
    /// Aggregate of member ports.
    Aggregate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDesc {
    pub id: String,
    pub kind: PortKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortUpdate {
    Actions {
        input: Vec<Action>,
        output: Vec<Action>,
    },
    AggregateAdd { member: String },
    AggregateRemove { member: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortStatus {
    pub admin_up: bool,
    pub oper_up: bool,
}

/// Generic attributes the engine keeps per object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectAttribute {
    Mtu(u32),
    Speed(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowCounterData {
    pub packets: u64,
    pub bytes: u64,
}

/// Asynchronous notifications from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PortState { port: String, oper_up: bool },
}
