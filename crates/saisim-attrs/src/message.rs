//! Declarative attribute schemas.

use crate::value::{AttrId, AttrValue};
use saisim_types::{ObjectType, SaiResult};
use std::fmt::Debug;

/// A structured set of optional attributes for one object type.
///
/// Implemented by [`attribute_message!`](crate::attribute_message); each
/// field is bound to one attribute id at compile time.
pub trait AttributeMessage: Default + Clone + Debug + Send + Sync + 'static {
    /// Object type this schema describes.
    const OBJECT_TYPE: ObjectType;

    /// Every present field as `(id, value)`, in schema order. Fields set to
    /// an empty list are included.
    fn attributes(&self) -> Vec<(AttrId, AttrValue)>;

    fn attribute(&self, id: AttrId) -> Option<AttrValue>;

    /// Assigns the field bound to `id`. Returns `Ok(false)` when the schema
    /// has no such attribute and `Internal` when the value has the wrong type.
    fn set_attribute(&mut self, id: AttrId, value: &AttrValue) -> SaiResult<bool>;

    fn has_attribute(id: AttrId) -> bool;
}

/// Declares an attribute schema.
///
/// Generates a struct with one `Option` field per attribute, an associated
/// constant per attribute id, and the [`AttributeMessage`] impl.
#[macro_export]
macro_rules! attribute_message {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident for $otype:ident {
            $(
                $(#[$fmeta:meta])*
                $konst:ident = $id:literal => $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            $(pub const $konst: $crate::AttrId = $id;)*
        }

        impl $crate::AttributeMessage for $name {
            const OBJECT_TYPE: $crate::types::ObjectType = $crate::types::ObjectType::$otype;

            #[allow(unused_mut)]
            fn attributes(&self) -> Vec<($crate::AttrId, $crate::AttrValue)> {
                let mut attrs = Vec::new();
                $(
                    if let Some(value) = &self.$field {
                        attrs.push(($id, $crate::AttrType::into_value(value.clone())));
                    }
                )*
                attrs
            }

            #[allow(unused_variables)]
            fn attribute(&self, id: $crate::AttrId) -> Option<$crate::AttrValue> {
                $(
                    if id == $id {
                        return self
                            .$field
                            .clone()
                            .map($crate::AttrType::into_value);
                    }
                )*
                None
            }

            #[allow(unused_variables)]
            fn set_attribute(
                &mut self,
                id: $crate::AttrId,
                value: &$crate::AttrValue,
            ) -> $crate::types::SaiResult<bool> {
                $(
                    if id == $id {
                        let typed = <$ty as $crate::AttrType>::from_value(value).ok_or_else(|| {
                            $crate::types::SaiError::internal(format!(
                                "{}.{}: stored value {:?} has the wrong type",
                                stringify!($name),
                                stringify!($field),
                                value
                            ))
                        })?;
                        self.$field = Some(typed);
                        return Ok(true);
                    }
                )*
                Ok(false)
            }

            fn has_attribute(id: $crate::AttrId) -> bool {
                [$($id),*].contains(&id)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{AttrValue, AttributeMessage};
    use pretty_assertions::assert_eq;
    use saisim_types::{Code, ObjectType};

    attribute_message! {
        struct LagAttrs for Lag {
            PORT_LIST = 1 => port_list: Vec<u64>,
            LABEL = 2 => label: String,
            PORT_VLAN_ID = 3 => port_vlan_id: u16,
        }
    }

    attribute_message! {
        struct SwitchOnlyAttrs for Switch {}
    }

    #[test]
    fn test_attributes_in_schema_order() {
        let attrs = LagAttrs {
            port_list: Some(vec![]),
            label: None,
            port_vlan_id: Some(5),
        };
        assert_eq!(
            attrs.attributes(),
            vec![
                (LagAttrs::PORT_LIST, AttrValue::U64List(vec![])),
                (LagAttrs::PORT_VLAN_ID, AttrValue::U16(5)),
            ]
        );
        assert_eq!(LagAttrs::OBJECT_TYPE, ObjectType::Lag);
    }

    #[test]
    fn test_set_attribute() {
        let mut attrs = LagAttrs::default();
        assert!(attrs
            .set_attribute(LagAttrs::LABEL, &AttrValue::Str("po1".to_string()))
            .unwrap());
        assert_eq!(attrs.label.as_deref(), Some("po1"));
        assert!(!attrs.set_attribute(99, &AttrValue::Bool(true)).unwrap());

        let err = attrs
            .set_attribute(LagAttrs::PORT_VLAN_ID, &AttrValue::Str("x".to_string()))
            .unwrap_err();
        assert_eq!(err.code(), Code::Internal);
    }

    #[test]
    fn test_attribute_lookup() {
        let attrs = LagAttrs {
            port_vlan_id: Some(9),
            ..Default::default()
        };
        assert_eq!(attrs.attribute(LagAttrs::PORT_VLAN_ID), Some(AttrValue::U16(9)));
        assert_eq!(attrs.attribute(LagAttrs::LABEL), None);
        assert!(LagAttrs::has_attribute(LagAttrs::LABEL));
        assert!(!LagAttrs::has_attribute(4));
    }

    #[test]
    fn test_empty_schema_ignores_every_id() {
        let mut attrs = SwitchOnlyAttrs::default();
        assert!(!attrs.set_attribute(1, &AttrValue::Bool(true)).unwrap());
        assert_eq!(attrs.attribute(1), None);
        assert!(attrs.attributes().is_empty());
        assert!(!SwitchOnlyAttrs::has_attribute(1));
        assert_eq!(SwitchOnlyAttrs::OBJECT_TYPE, ObjectType::Switch);
    }
}
