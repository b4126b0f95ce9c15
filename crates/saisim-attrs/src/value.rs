//! Attribute values and typed conversions.

use saisim_types::{IpPrefix, MacAddress};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Attribute identifier, meaningful only within one object type.
pub type AttrId = i32;

/// Masked match data of an ACL entry field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclField {
    pub data: Vec<u8>,
    pub mask: Vec<u8>,
}

impl AclField {
    pub fn new(data: Vec<u8>, mask: Vec<u8>) -> Self {
        Self { data, mask }
    }

    /// Field matching `data` exactly.
    pub fn exact(data: Vec<u8>) -> Self {
        let mask = vec![0xff; data.len()];
        Self { data, mask }
    }
}

/// User-defined-field match of an ACL entry, bound to a UDF group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UdfField {
    pub group: u64,
    pub data: Vec<u8>,
    pub mask: Vec<u8>,
}

/// Tagged union of every value an attribute can hold.
///
/// List variants holding an empty vector are a stored value, distinct from
/// an attribute that was never set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I32(i32),
    Str(String),
    Bytes(Vec<u8>),
    Mac(MacAddress),
    Ip(IpAddr),
    Prefix(IpPrefix),
    U32List(Vec<u32>),
    I32List(Vec<i32>),
    U64List(Vec<u64>),
    AclField(AclField),
    UdfList(Vec<UdfField>),
}

/// Conversion between a schema field type and [`AttrValue`].
pub trait AttrType: Sized {
    fn into_value(self) -> AttrValue;
    fn from_value(value: &AttrValue) -> Option<Self>;
}

macro_rules! impl_attr_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl AttrType for $ty {
                fn into_value(self) -> AttrValue {
                    AttrValue::$variant(self)
                }

                fn from_value(value: &AttrValue) -> Option<Self> {
                    match value {
                        AttrValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_attr_type! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i32 => I32,
    String => Str,
    Vec<u8> => Bytes,
    MacAddress => Mac,
    IpAddr => Ip,
    IpPrefix => Prefix,
    Vec<u32> => U32List,
    Vec<i32> => I32List,
    Vec<u64> => U64List,
    AclField => AclField,
    Vec<UdfField> => UdfList,
}

/// Declares a SAI enumeration stored as an `i32` attribute.
///
/// ```
/// saisim_attrs::attr_enum! {
///     pub enum Color {
///         Red = 0,
///         Green = 1,
///     }
/// }
/// assert_eq!(Color::from_i32(1), Some(Color::Green));
/// ```
#[macro_export]
macro_rules! attr_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $value:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant = $value,)*
        }

        impl $name {
            pub fn from_i32(value: i32) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::AttrType for $name {
            fn into_value(self) -> $crate::AttrValue {
                $crate::AttrValue::I32(self as i32)
            }

            fn from_value(value: &$crate::AttrValue) -> Option<Self> {
                match value {
                    $crate::AttrValue::I32(v) => $name::from_i32(*v),
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    attr_enum! {
        enum Speed {
            Slow = 1,
            Fast = 2,
        }
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(42u32.into_value(), AttrValue::U32(42));
        assert_eq!(u32::from_value(&AttrValue::U32(7)), Some(7));
        assert_eq!(u32::from_value(&AttrValue::U64(7)), None);
    }

    #[test]
    fn test_empty_list_is_a_value() {
        let v = Vec::<u64>::new().into_value();
        assert_eq!(v, AttrValue::U64List(vec![]));
        assert_eq!(Vec::<u64>::from_value(&v), Some(vec![]));
    }

    #[test]
    fn test_enum_round_trip() {
        assert_eq!(Speed::Fast.into_value(), AttrValue::I32(2));
        assert_eq!(Speed::from_value(&AttrValue::I32(1)), Some(Speed::Slow));
        assert_eq!(Speed::from_value(&AttrValue::I32(9)), None);
    }
}
