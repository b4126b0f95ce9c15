//! Names of the fixed forwarding tables created at switch bootstrap.

pub const INGRESS_VRF: &str = "ingress-vrf";
pub const FIB_V4: &str = "fib-v4";
pub const FIB_V6: &str = "fib-v6";
pub const PORT_MAC: &str = "port-mac";
pub const VLAN: &str = "vlan";
pub const MY_MAC: &str = "my-mac";
pub const NEIGHBOR: &str = "neighbor";
pub const NEXT_HOP: &str = "next-hop";
pub const NEXT_HOP_GROUP: &str = "next-hop-group";
pub const FIB_SELECTOR: &str = "fib-selector";
pub const PRE_INGRESS: &str = "pre-ingress";
pub const INGRESS: &str = "ingress";
pub const EGRESS: &str = "egress";
pub const NEXT_HOP_ACTION: &str = "next-hop-action";
pub const TRAP: &str = "trap";
pub const IP2ME: &str = "ip2me";
pub const TRAP_ID_TO_HOSTIF: &str = "trap-id-to-hostif";
pub const INPUT_IFACE: &str = "input-iface";
pub const OUTPUT_IFACE: &str = "output-iface";
pub const TUNNEL_ENCAP: &str = "tunnel-encap";
pub const HOSTIF_TO_PORT: &str = "hostif-to-port";
pub const PORT_TO_HOSTIF: &str = "port-to-hostif";
pub const TUNNEL_TERM: &str = "tunnel-term";
