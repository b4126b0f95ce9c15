//! MAC address type.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// ```
/// use saisim_types::MacAddress;
///
/// let mac: MacAddress = "02:00:00:00:00:01".parse().unwrap();
/// assert_eq!(mac.as_bytes(), &[2, 0, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const ZERO: MacAddress = MacAddress([0; 6]);

    /// Mask matching every bit of an address.
    pub const EXACT_MASK: MacAddress = MacAddress([0xff; 6]);

    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Builds an address from a byte slice; anything but 6 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 6]>::try_from(bytes).ok().map(MacAddress)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = if s.contains(':') { ':' } else { '-' };

        let parts: Vec<&str> = s.split(separator).collect();
        if parts.len() != 6 {
            return Err(ParseError::InvalidMacAddress(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| ParseError::InvalidMacAddress(s.to_string()))?;
        }

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_both_separators() {
        let a: MacAddress = "00:11:22:33:44:55".parse().unwrap();
        let b: MacAddress = "00-11-22-33-44-55".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "00:11:22:33:44:55");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("00:11:22:33:44".parse::<MacAddress>().is_err());
        assert!("zz:11:22:33:44:55".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_from_slice() {
        assert_eq!(
            MacAddress::from_slice(&[1, 2, 3, 4, 5, 6]),
            Some(MacAddress::new([1, 2, 3, 4, 5, 6]))
        );
        assert_eq!(MacAddress::from_slice(&[1, 2, 3]), None);
    }

    #[test]
    fn test_serde_as_string() {
        let mac = MacAddress::new([0xaa, 0xbb, 0xcc, 0, 0, 1]);
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"aa:bb:cc:00:00:01\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
