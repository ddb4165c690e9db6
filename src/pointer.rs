//! Pointer layers: `Option<T>` is a nullable pointer, `Box<T>` an owned one.
//!
//! Assigning through a pointer chain always builds a fresh chain from the base
//! value outward and swaps it in whole, so an existing (possibly partial) chain
//! is never reused and a rejected value leaves the field untouched.

use crate::field::Field;
use crate::schema::{Configuration, FieldType};
use crate::value::Value;

/// Builds a new `T` holding `value`, allocating every pointer layer `T` needs.
fn materialize<T: Field + Default>(value: Value) -> Result<T, Value> {
    let mut fresh = T::default();
    fresh.assign(value)?;
    Ok(fresh)
}

impl<T: Field + Default> Field for Option<T> {
    fn field_type() -> FieldType {
        T::field_type().pointer()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        *self = Some(materialize(value)?);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn as_configuration(&mut self) -> Option<&mut dyn Configuration> {
        if !T::field_type().base.is_struct() {
            return None;
        }
        self.get_or_insert_with(T::default).as_configuration()
    }

    fn clear(&mut self) {
        *self = None;
    }
}

impl<T: Field + Default> Field for Box<T> {
    fn field_type() -> FieldType {
        T::field_type().pointer()
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        *self = Box::new(materialize(value)?);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn as_configuration(&mut self) -> Option<&mut dyn Configuration> {
        (**self).as_configuration()
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[derive(Debug, Default, PartialEq, crate::Configuration)]
    struct Inner {
        #[config(key = "name")]
        name: String,
    }

    #[test]
    fn test_field_type_counts_layers() {
        let ty = <Option<Box<Option<u32>>> as Field>::field_type();
        assert_eq!(ty.indirection, 3);
        assert_eq!(ty.base, FieldKind::U32);
    }

    #[test]
    fn test_materialize_deep_chain() {
        let mut field: Option<Option<Option<Option<Option<u32>>>>> = None;
        field.assign(Value::U32(10)).unwrap();
        assert_eq!(field, Some(Some(Some(Some(Some(10))))));
    }

    #[test]
    fn test_partial_chain_is_replaced() {
        let mut field: Option<Option<u8>> = Some(None);
        field.assign(Value::U8(3)).unwrap();
        assert_eq!(field, Some(Some(3)));
    }

    #[test]
    fn test_boxed_chain() {
        let mut field: Box<Box<i16>> = Box::default();
        field.assign(Value::I16(-4)).unwrap();
        assert_eq!(**field, -4);
    }

    #[test]
    fn test_rejected_value_leaves_chain_untouched() {
        let mut field: Option<Option<u8>> = Some(Some(1));
        assert!(field.assign(Value::String("x".into())).is_err());
        assert_eq!(field, Some(Some(1)));
    }

    #[test]
    fn test_zero_pointers() {
        assert!(None::<u8>.is_zero());
        assert!(!Some(0u8).is_zero());
        assert!(Box::new(0u8).is_zero());
    }

    #[test]
    fn test_struct_pointer_allocates_and_clears() {
        let mut field: Option<Box<Inner>> = None;
        assert!(field.as_configuration().is_some());
        assert_eq!(field, Some(Box::default()));

        field.clear();
        assert_eq!(field, None);
    }

    #[test]
    fn test_scalar_pointer_is_not_a_struct() {
        let mut field: Option<u8> = None;
        assert!(field.as_configuration().is_none());
        assert_eq!(field, None);
    }
}
