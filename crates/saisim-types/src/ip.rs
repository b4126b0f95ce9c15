//! IP prefix type in address/mask form.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Returns the network-order octets of an address (4 or 16 bytes).
pub fn ip_octets(addr: &IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// An IP prefix carried as an address plus a mask of the same family.
///
/// SAI route entries and ACL fields express prefixes this way rather than
/// as a length, so non-contiguous masks are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpPrefix {
    pub addr: IpAddr,
    pub mask: IpAddr,
}

impl IpPrefix {
    /// Builds a prefix from an address and a prefix length.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, ParseError> {
        let mask = match addr {
            IpAddr::V4(_) if prefix_len <= 32 => {
                let bits = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(bits))
            }
            IpAddr::V6(_) if prefix_len <= 128 => {
                let bits = u128::MAX.checked_shl(128 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(bits))
            }
            _ => {
                return Err(ParseError::InvalidIpPrefix(format!("{}/{}", addr, prefix_len)));
            }
        };
        Ok(Self { addr, mask })
    }

    /// Host prefix (/32 or /128) for an address.
    pub fn host(addr: IpAddr) -> Self {
        let len = if addr.is_ipv4() { 32 } else { 128 };
        // Lengths 32 and 128 are always valid for their family.
        Self::new(addr, len).unwrap_or(Self { addr, mask: addr })
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    /// Number of set bits in the mask.
    pub fn prefix_len(&self) -> u32 {
        self.mask_octets().iter().map(|b| b.count_ones()).sum()
    }

    pub fn mask_octets(&self) -> Vec<u8> {
        ip_octets(&self.mask)
    }

    /// Address octets with host bits cleared.
    pub fn network_octets(&self) -> Vec<u8> {
        ip_octets(&self.addr)
            .into_iter()
            .zip(self.mask_octets())
            .map(|(a, m)| a & m)
            .collect()
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len())
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = match s.split_once('/') {
            Some((addr, len)) => {
                let len = len
                    .parse::<u8>()
                    .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
                (addr, Some(len))
            }
            None => (s, None),
        };
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        match len {
            Some(len) => Self::new(addr, len),
            None => Ok(Self::host(addr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_v4() {
        let p: IpPrefix = "10.1.2.3/24".parse().unwrap();
        assert!(p.is_ipv4());
        assert_eq!(p.prefix_len(), 24);
        assert_eq!(p.mask_octets(), vec![255, 255, 255, 0]);
        assert_eq!(p.network_octets(), vec![10, 1, 2, 0]);
    }

    #[test]
    fn test_parse_v6_host() {
        let p: IpPrefix = "2001:db8::1".parse().unwrap();
        assert!(!p.is_ipv4());
        assert_eq!(p.prefix_len(), 128);
        assert_eq!(p.to_string(), "2001:db8::1/128");
    }

    #[test]
    fn test_zero_length() {
        let p: IpPrefix = "0.0.0.0/0".parse().unwrap();
        assert_eq!(p.mask_octets(), vec![0, 0, 0, 0]);
        assert_eq!(p.prefix_len(), 0);
    }

    #[test]
    fn test_invalid_length() {
        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());
        assert!("10.0.0.0/x".parse::<IpPrefix>().is_err());
        assert!("nonsense/8".parse::<IpPrefix>().is_err());
    }
}
